use crate::error::CollaboratorError;
use serde::{Deserialize, Serialize};

/// Reply from an OCR service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OcrResponse {
    pub success: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OcrResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.into()),
        }
    }
}

/// Optical character recognition over a whole document buffer
#[async_trait::async_trait]
pub trait OcrProvider: Send + Sync {
    /// Recognize the text of `bytes`. A reachable service that could not
    /// read the document answers `Ok` with `success == false`.
    async fn extract(
        &self,
        bytes: &[u8],
        declared_type: &str,
        filename: &str,
    ) -> Result<OcrResponse, CollaboratorError>;
}
