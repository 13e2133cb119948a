use std::sync::LazyLock;

use regex::Regex;

pub const MAX_BIO_SENTENCES: usize = 3;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid markdown link regex"));

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence break regex"));

pub fn clean_text(text: &str) -> Option<String> {
    let unlinked = MARKDOWN_LINK.replace_all(text, "$1");
    let straightened: String = unlinked
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect();
    let collapsed = collapse_whitespace(&straightened);
    (!collapsed.is_empty()).then_some(collapsed)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BREAK.find_iter(text) {
        sentences.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

pub fn trim_bio(source: Option<&str>, max_sentences: usize) -> Option<String> {
    let cleaned = clean_text(source?)?;
    let sentences = split_sentences(&cleaned);
    let trimmed = sentences
        .into_iter()
        .take(max_sentences)
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = trimmed.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
