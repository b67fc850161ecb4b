use regex::Regex;
use std::sync::OnceLock;

/// Bounds applied to list items pulled out of a model response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLimits {
    pub max_items: usize,
    pub min_chars: usize,
    pub max_chars: usize,
}

/// Remove leading/trailing markdown code fences (```json ... ```)
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string on the opening fence line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse a list of strings from a model response. Strict JSON array first;
/// when that fails, split on line breaks and bullet markers.
pub fn parse_list(response: &str, limits: ItemLimits) -> Vec<String> {
    let body = strip_code_fences(response);

    let items = parse_json_array(body).unwrap_or_else(|| split_delimited(body));

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| {
            let len = item.chars().count();
            len >= limits.min_chars && len <= limits.max_chars
        })
        .take(limits.max_items)
        .collect()
}

/// Summary responses are prose; only fences and surrounding whitespace go
pub fn parse_summary(response: &str) -> Option<String> {
    let body = strip_code_fences(response);
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

fn parse_json_array(body: &str) -> Option<Vec<String>> {
    let start = body.find('[')?;
    let end = body.rfind(']')?;
    if end <= start {
        return None;
    }

    let values: Vec<serde_json::Value> = serde_json::from_str(&body[start..=end]).ok()?;
    let items: Vec<String> = values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map
                .values()
                .find_map(|v| v.as_str().map(str::to_string)),
            _ => None,
        })
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn enumeration_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        // One marker only; a numeric marker needs whitespace so "2.5%" survives
        Regex::new(r"^(?:[-*+•·]\s*|\(?\d{1,2}[.)]\s+|\(?[a-zA-Z][.)]\s+)")
            .expect("enumeration pattern is valid")
    })
}

fn split_delimited(body: &str) -> Vec<String> {
    body.split(['\n', '•'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        // Headings such as "Key terms:" introduce the list
        .filter(|line| !line.ends_with(':'))
        .map(|line| {
            let line = enumeration_prefix().replace(line, "");
            line.trim()
                .trim_matches(|c: char| matches!(c, '"' | '\'' | ',' | '*' | '`' | '[' | ']'))
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}
