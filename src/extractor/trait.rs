use crate::error::ExtractionError;
use crate::extractor::DocumentFormat;
use crate::models::ExtractionMethod;

/// Trait for extraction strategies that turn a document buffer into text.
///
/// Implementations are pure: no I/O, no shared state. Malformed input must
/// come back as an `Err`, never as a panic across this boundary.
pub trait TextExtractor: Send + Sync {
    /// Method reported when this extractor's output is accepted
    fn method(&self) -> ExtractionMethod;

    /// Check if this extractor handles the given format
    fn supports(&self, format: DocumentFormat) -> bool;

    /// Extract raw (uncleaned) text from the buffer
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}
