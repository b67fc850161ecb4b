use std::time::Duration;
use thiserror::Error;

/// Errors from external collaborators (storage, OCR, inference).
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollaboratorError {
    /// Whether a bounded retry may help
    pub fn is_retryable(&self) -> bool {
        match self {
            CollaboratorError::Timeout { .. } | CollaboratorError::Connection(_) => true,
            CollaboratorError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CollaboratorError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            CollaboratorError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            CollaboratorError::Connection(err.to_string())
        }
    }
}

/// Errors from a single extraction strategy. Never fatal on their own.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed {format}: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    #[error("{0} produced no text")]
    Empty(&'static str),

    #[error("{0} panicked on malformed input")]
    Panicked(&'static str),

    #[error("text rejected by validity check")]
    Invalid,

    #[error("text too short ({len} chars, need {min})")]
    TooShort { len: usize, min: usize },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Errors from the analysis dispatcher
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("inference failed: {0}")]
    Inference(#[from] CollaboratorError),

    #[error("inference returned an empty response")]
    EmptyResponse,

    #[error("could not parse {analysis_type} from inference response")]
    Unparseable { analysis_type: &'static str },

    #[error("text too short for analysis ({len} chars, need {min})")]
    TextTooShort { len: usize, min: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        let timeout = CollaboratorError::Timeout {
            operation: "download",
            timeout: Duration::from_secs(1),
        };
        assert!(timeout.is_retryable());
        assert!(CollaboratorError::Connection("reset".into()).is_retryable());
        assert!(CollaboratorError::Api { status: 503, message: String::new() }.is_retryable());
        assert!(CollaboratorError::Api { status: 429, message: String::new() }.is_retryable());
        assert!(!CollaboratorError::Api { status: 400, message: String::new() }.is_retryable());
        assert!(!CollaboratorError::NotFound("blob".into()).is_retryable());
    }

    #[test]
    fn test_timeout_message_names_operation() {
        let err = CollaboratorError::Timeout {
            operation: "inference",
            timeout: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "inference timed out after 60s");
    }
}
