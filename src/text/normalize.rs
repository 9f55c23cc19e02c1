use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap()
});

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());

// A tag opener that never closes, e.g. a feed summary cut off mid-markup.
static UNTERMINATED_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z/!?][^<>]*$").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Turn feed markup into plain text.
///
/// Tags, comments and script/style blocks are removed, HTML entities are
/// decoded and whitespace runs collapse to single spaces. Entity-escaped
/// markup (`&lt;p&gt;`) is decoded and then stripped as well, so the result is
/// a fixed point: normalizing it again returns it unchanged.
pub fn normalize_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    // A pass that changes its input either shortens it or only turns other
    // whitespace into plain spaces, so this reaches a fixed point.
    let mut current = single_pass(raw);
    loop {
        let next = single_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Normalize an optional field, mapping empty output to `None`.
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_text).filter(|text| !text.is_empty())
}

fn single_pass(input: &str) -> String {
    let decoded = html_escape::decode_html_entities(input);
    let without_blocks = SCRIPT_STYLE_REGEX.replace_all(&decoded, " ");
    let without_comments = COMMENT_REGEX.replace_all(&without_blocks, " ");
    let without_tags = TAG_REGEX.replace_all(&without_comments, " ");
    let without_dangling = UNTERMINATED_TAG_REGEX.replace(&without_tags, " ");
    // Non-breaking spaces are whitespace for our purposes.
    let spaced = without_dangling.replace('\u{a0}', " ");
    WHITESPACE_REGEX.replace_all(&spaced, " ").trim().to_string()
}
