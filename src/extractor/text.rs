use crate::error::ExtractionError;
use crate::extractor::{DocumentFormat, TextExtractor};
use crate::models::ExtractionMethod;

/// Decoder for plain text files (.txt, .md, .csv)
///
/// UTF-8 (with or without BOM) and BOM-marked UTF-16 are decoded exactly;
/// anything else falls back to Latin-1 so decoding never fails on bytes alone.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn decode_utf16(bytes: &[u8], little_endian: bool) -> Result<String, ExtractionError> {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| {
                if little_endian {
                    u16::from_le_bytes([pair[0], pair[1]])
                } else {
                    u16::from_be_bytes([pair[0], pair[1]])
                }
            })
            .collect();

        String::from_utf16(&units).map_err(|e| ExtractionError::Malformed {
            format: "plain text",
            message: e.to_string(),
        })
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PlainTextExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PlainText
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::PlainText
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = match bytes {
            [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
            [0xFF, 0xFE, rest @ ..] => Self::decode_utf16(rest, true)?,
            [0xFE, 0xFF, rest @ ..] => Self::decode_utf16(rest, false)?,
            _ => match std::str::from_utf8(bytes) {
                Ok(s) => s.to_string(),
                Err(_) => bytes.iter().map(|&b| b as char).collect(),
            },
        };

        if text.contains('\0') {
            return Err(ExtractionError::Malformed {
                format: "plain text",
                message: "buffer contains NUL bytes; not a text file".to_string(),
            });
        }

        if text.trim().is_empty() {
            return Err(ExtractionError::Empty("plain text"));
        }

        Ok(text)
    }
}
