use crate::error::ExtractionError;
use crate::extractor::{DocumentFormat, TextExtractor};
use crate::models::ExtractionMethod;
use regex::{Captures, Regex};

/// Groups whose content is never document text
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "generator",
    "themedata",
    "colorschememapping",
    "datastore",
    "latentstyles",
    "xmlnstbl",
];

// Placeholders for escaped literals while braces and backslashes are stripped
const ESCAPED_BACKSLASH: char = '\u{E000}';
const ESCAPED_OPEN: char = '\u{E001}';
const ESCAPED_CLOSE: char = '\u{E002}';

/// Lossy RTF-to-text cleanup pass. Not a full RTF parser: it drops
/// non-content destination groups, decodes escapes and strips control words.
pub struct RtfExtractor {
    word_then_newline: Regex,
    unicode_escape: Regex,
    hex_escape: Regex,
    paragraph_break: Regex,
    tab: Regex,
    control_word: Regex,
    control_symbol: Regex,
}

impl RtfExtractor {
    pub fn new() -> Self {
        let compile = |pattern: &str| Regex::new(pattern).expect("RTF pattern is valid");
        Self {
            word_then_newline: compile(r"(\\[a-zA-Z]+-?\d*)\r?\n"),
            unicode_escape: compile(r"\\u(-?\d+) ?(?:\\'[0-9a-fA-F]{2}|\?)?"),
            hex_escape: compile(r"\\'([0-9a-fA-F]{2})"),
            paragraph_break: compile(r"\\(?:par|line|sect|page|row)\b ?"),
            tab: compile(r"\\(?:tab|cell)\b ?"),
            control_word: compile(r"\\[a-zA-Z]+-?\d* ?"),
            control_symbol: compile(r"\\[^a-zA-Z0-9]"),
        }
    }

    /// Remove `{\*...}` and known non-content groups, including nested groups
    fn strip_destinations(source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        let mut out = String::with_capacity(source.len());
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == '{' && Self::opens_skipped_group(&chars[i + 1..]) {
                let mut depth = 0usize;
                while i < chars.len() {
                    match chars[i] {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                i += 1;
                                break;
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                continue;
            }
            out.push(chars[i]);
            i += 1;
        }

        out
    }

    fn opens_skipped_group(rest: &[char]) -> bool {
        let head: String = rest.iter().take(32).collect();
        let head = head.trim_start();
        if head.starts_with("\\*") {
            return true;
        }
        match head.strip_prefix('\\') {
            Some(word) => {
                let name: String = word.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
                SKIPPED_DESTINATIONS.contains(&name.as_str())
            }
            None => false,
        }
    }

    fn decode(&self, source: &str) -> String {
        let text = source
            .replace("\\\\", &ESCAPED_BACKSLASH.to_string())
            .replace("\\{", &ESCAPED_OPEN.to_string())
            .replace("\\}", &ESCAPED_CLOSE.to_string());

        // Raw line breaks only delimit control words
        let text = self.word_then_newline.replace_all(&text, "$1 ");
        let text = text.replace(['\r', '\n'], "");

        let text = Self::strip_destinations(&text);

        let text = self.unicode_escape.replace_all(&text, |caps: &Captures| {
            caps[1]
                .parse::<i32>()
                .ok()
                .map(|n| if n < 0 { n + 65536 } else { n })
                .and_then(|n| char::from_u32(n as u32))
                .map(String::from)
                .unwrap_or_default()
        });
        let text = self.hex_escape.replace_all(&text, |caps: &Captures| {
            u8::from_str_radix(&caps[1], 16)
                .map(|b| (b as char).to_string())
                .unwrap_or_default()
        });

        let text = self.paragraph_break.replace_all(&text, "\n");
        let text = self.tab.replace_all(&text, "\t");
        let text = text.replace("\\~", " ");
        let text = self.control_word.replace_all(&text, "");
        let text = self.control_symbol.replace_all(&text, "");

        text.chars()
            .filter(|c| *c != '{' && *c != '}')
            .map(|c| match c {
                ESCAPED_BACKSLASH => '\\',
                ESCAPED_OPEN => '{',
                ESCAPED_CLOSE => '}',
                other => other,
            })
            .collect()
    }
}

impl Default for RtfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for RtfExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Rtf
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Rtf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let source = String::from_utf8_lossy(bytes);
        if !source.trim_start().starts_with("{\\rtf") {
            return Err(ExtractionError::Malformed {
                format: "rtf",
                message: "missing {\\rtf header".to_string(),
            });
        }

        let text = self.decode(&source);
        if text.trim().is_empty() {
            return Err(ExtractionError::Empty("rtf"));
        }
        Ok(text)
    }
}
