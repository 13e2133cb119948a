use std::sync::LazyLock;

use regex::Regex;

pub const MAX_QUALIFIER_CHARS: usize = 40;

const QUALIFIER_PUNCTUATION: &[char] = &[' ', '-', ':', ';', ','];

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid parenthetical regex"));

pub fn display_name(name: &str, disambiguation: Option<&str>) -> String {
    match extract_qualifier(name, disambiguation) {
        Some(short) if short.to_lowercase() != name.to_lowercase() => format!("{name} ({short})"),
        _ => name.to_string(),
    }
}

pub fn extract_qualifier(name: &str, disambiguation: Option<&str>) -> Option<String> {
    let cleaned = disambiguation?.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(parenthetical) = first_parenthetical(cleaned) {
        return shorten_qualifier(name, parenthetical);
    }

    if let Some(rest) = cleaned.strip_prefix(name) {
        let remainder = rest.trim_matches(QUALIFIER_PUNCTUATION);
        if !remainder.is_empty() {
            return shorten_qualifier(name, remainder);
        }
    }

    shorten_qualifier(name, cleaned)
}

fn first_parenthetical(text: &str) -> Option<&str> {
    PARENTHETICAL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn shorten_qualifier(name: &str, text: &str) -> Option<String> {
    let mut candidate = text.trim();

    if let Some(rest) = strip_prefix_ignore_case(candidate, name) {
        candidate = rest.trim_matches(QUALIFIER_PUNCTUATION);
    }

    if let Some(rest) = strip_prefix_ignore_case(candidate, "is ") {
        candidate = rest.trim();
    } else if let Some(rest) = strip_prefix_ignore_case(candidate, "was ") {
        candidate = rest.trim();
    }

    let mut quoted = candidate.split('"');
    if let (Some(_), Some(inner), Some(_)) = (quoted.next(), quoted.next(), quoted.next()) {
        if !inner.trim().is_empty() {
            candidate = inner.trim();
        }
    }

    if let Some((head, _)) = candidate.split_once(',') {
        let head = head.trim();
        if !head.is_empty() {
            candidate = head;
        }
    }

    let truncated: String = candidate.chars().take(MAX_QUALIFIER_CHARS).collect();
    let truncated = truncated.trim();
    (!truncated.is_empty()).then(|| truncated.to_string())
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = rest.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(match rest.next() {
        Some((idx, _)) => &text[idx..],
        None => "",
    })
}

pub fn normalize_name(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
