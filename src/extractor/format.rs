use crate::constants::{DOCX_MIME_TYPES, PDF_MIME_TYPES, PLAIN_TEXT_MIME_TYPES, RTF_MIME_TYPES};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format families the pipeline can extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    Rtf,
    Docx,
    Pdf,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "plain text",
            DocumentFormat::Rtf => "rtf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
        }
    }

    /// Canonical mime type for the format
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => PLAIN_TEXT_MIME_TYPES[0],
            DocumentFormat::Rtf => RTF_MIME_TYPES[0],
            DocumentFormat::Docx => DOCX_MIME_TYPES[0],
            DocumentFormat::Pdf => PDF_MIME_TYPES[0],
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        // Drop parameters such as "; charset=utf-8"
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        let essence = essence.as_str();

        if PDF_MIME_TYPES.contains(&essence) {
            Some(DocumentFormat::Pdf)
        } else if DOCX_MIME_TYPES.contains(&essence) {
            Some(DocumentFormat::Docx)
        } else if RTF_MIME_TYPES.contains(&essence) {
            Some(DocumentFormat::Rtf)
        } else if PLAIN_TEXT_MIME_TYPES.contains(&essence) {
            Some(DocumentFormat::PlainText)
        } else {
            None
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "rtf" => Some(DocumentFormat::Rtf),
            "txt" | "text" | "md" | "markdown" | "csv" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }

    /// Sniff the buffer's magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if let Some(kind) = infer::get(bytes) {
            return Self::from_mime(kind.mime_type());
        }
        if !bytes.is_empty() && !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok() {
            return Some(DocumentFormat::PlainText);
        }
        None
    }

    /// Resolve the format from the declared mime type, then the filename
    /// extension, then the content itself.
    pub fn detect(declared_type: &str, filename: &str, bytes: &[u8]) -> Option<Self> {
        Self::from_mime(declared_type)
            .or_else(|| utils::get_extension(filename).and_then(|ext| Self::from_extension(&ext)))
            .or_else(|| Self::sniff(bytes))
    }

    /// Resolve without content; used before the blob is downloaded
    pub fn declared(declared_type: &str, filename: &str) -> Option<Self> {
        Self::from_mime(declared_type)
            .or_else(|| utils::get_extension(filename).and_then(|ext| Self::from_extension(&ext)))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_ignores_parameters() {
        assert_eq!(
            DocumentFormat::from_mime("text/plain; charset=utf-8"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(DocumentFormat::from_mime("APPLICATION/PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_mime("application/octet-stream"), None);
    }

    #[test]
    fn test_extension_used_when_mime_is_generic() {
        let format = DocumentFormat::detect("application/octet-stream", "lease.RTF", b"");
        assert_eq!(format, Some(DocumentFormat::Rtf));
    }

    #[test]
    fn test_mime_wins_over_extension() {
        let format = DocumentFormat::detect("application/pdf", "scan.txt", b"");
        assert_eq!(format, Some(DocumentFormat::Pdf));
    }

    #[test]
    fn test_sniffs_pdf_magic() {
        let format = DocumentFormat::detect("", "upload", b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj");
        assert_eq!(format, Some(DocumentFormat::Pdf));
    }

    #[test]
    fn test_sniffs_utf8_text() {
        let format = DocumentFormat::detect("", "notes", "Plain notes about the deal".as_bytes());
        assert_eq!(format, Some(DocumentFormat::PlainText));
    }

    #[test]
    fn test_unknown_binary_is_unsupported() {
        assert_eq!(DocumentFormat::detect("", "blob", &[0u8, 159, 146, 150, 0, 1]), None);
    }
}
