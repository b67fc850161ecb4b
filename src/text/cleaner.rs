use regex::Regex;
use std::sync::OnceLock;

fn page_furniture() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:page\s+\d+(?:\s+of\s+\d+)?|\d+|-\s*\d+\s*-)$")
            .expect("page furniture pattern is valid")
    })
}

/// Normalize extracted text.
///
/// Collapses horizontal whitespace, trims every line, drops page-number lines
/// ("Page 3 of 12", "14", "- 2 -"), keeps at most one blank line between
/// paragraphs and trims the result. Idempotent.
pub fn clean(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace(['\r', '\x0c'], "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0usize;

    for raw in normalized.split('\n') {
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        if !line.is_empty() && page_furniture().is_match(&line) {
            continue;
        }

        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}
