use crate::config::ValidityConfig;
use crate::constants::STRUCTURE_MARKERS;
use regex::Regex;
use std::fmt;

/// Outcome of checking extracted text for format-internal noise
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Valid,
    /// Too many distinct PDF/DOCX structure markers
    StructureMarkers(usize),
    /// Share of word-like tokens below the configured minimum
    LowWordRatio(f64),
    /// No token long enough to count as a candidate word
    NoWords,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => write!(f, "valid"),
            Verdict::StructureMarkers(n) => write!(f, "{} structure markers present", n),
            Verdict::LowWordRatio(ratio) => {
                write!(f, "only {:.0}% of tokens are words", ratio * 100.0)
            }
            Verdict::NoWords => write!(f, "no word tokens"),
        }
    }
}

/// Coarse statistical filter separating readable text from dumped
/// container internals (object streams, xref tables, filter declarations).
pub struct TextValidator {
    config: ValidityConfig,
    word: Regex,
}

impl TextValidator {
    pub fn new(config: ValidityConfig) -> Self {
        Self {
            config,
            word: Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("word pattern is valid"),
        }
    }

    pub fn is_valid(&self, text: &str) -> bool {
        self.evaluate(text).is_valid()
    }

    pub fn evaluate(&self, text: &str) -> Verdict {
        let lower = text.to_lowercase();
        let markers = STRUCTURE_MARKERS
            .iter()
            .filter(|marker| lower.contains(*marker))
            .count();
        if markers > self.config.max_structure_markers {
            return Verdict::StructureMarkers(markers);
        }

        let mut candidates = 0usize;
        let mut meaningful = 0usize;
        for token in text.split_whitespace() {
            if token.chars().count() < self.config.min_token_chars {
                continue;
            }
            candidates += 1;
            if self.word.is_match(token) {
                meaningful += 1;
            }
        }

        if candidates == 0 {
            return Verdict::NoWords;
        }

        let ratio = meaningful as f64 / candidates as f64;
        if ratio < self.config.min_meaningful_ratio {
            return Verdict::LowWordRatio(ratio);
        }

        Verdict::Valid
    }
}

impl Default for TextValidator {
    fn default() -> Self {
        Self::new(ValidityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_natural_language() {
        let validator = TextValidator::default();
        let text = "This Master Services Agreement is entered into by and between the \
                    Company and the Consultant and governs the services described below.";
        assert!(validator.is_valid(text));
    }

    #[test]
    fn test_rejects_three_distinct_markers() {
        let validator = TextValidator::default();
        let text = "Quarterly report of the board endobj some words xref more words trailer end";
        assert_eq!(validator.evaluate(text), Verdict::StructureMarkers(3));
    }

    #[test]
    fn test_two_markers_still_pass() {
        let validator = TextValidator::default();
        let text = "The trailer park lease renews each year and the xref column lists parcels";
        assert!(validator.is_valid(text));
    }

    #[test]
    fn test_startxref_counts_as_one_marker() {
        let validator = TextValidator::default();
        let text = "Please review the startxref and trailer columns in the ledger before closing the quarter.";
        assert_eq!(validator.evaluate(text), Verdict::Valid);
    }

    #[test]
    fn test_no_marker_contains_another() {
        for (i, outer) in STRUCTURE_MARKERS.iter().enumerate() {
            for (j, inner) in STRUCTURE_MARKERS.iter().enumerate() {
                assert!(i == j || !outer.contains(inner), "{} contains {}", outer, inner);
            }
        }
    }

    #[test]
    fn test_rejects_symbol_noise() {
        let validator = TextValidator::default();
        let text = "0x3F2A 4f:2a:11 ~~~ ^&*( 9932.11 0011010 ###$ <<>> 77a-2 ..,,..";
        assert!(matches!(validator.evaluate(text), Verdict::LowWordRatio(_)));
    }

    #[test]
    fn test_rejects_text_without_candidate_words() {
        let validator = TextValidator::default();
        assert_eq!(validator.evaluate("a b c 1 2"), Verdict::NoWords);
        assert_eq!(validator.evaluate(""), Verdict::NoWords);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let strict = TextValidator::new(ValidityConfig {
            min_meaningful_ratio: 0.9,
            ..ValidityConfig::default()
        });
        // 2 of 5 candidate tokens match the word pattern
        let text = "Payment due: 30 days, invoices monthly.";
        assert!(!strict.is_valid(text));
        assert!(TextValidator::default().is_valid(text));
    }
}
