pub mod reader;
pub mod reject;

#[cfg(test)]
mod tests;

use crate::fetcher::types::FetchedDocument;
use crate::text::{compact, normalize_text};

/// Longest article body kept as a summary source.
pub const MAX_ARTICLE_CHARS: usize = 5000;

/// Readable text of an article page, or `None` when the page has no usable
/// body (too short, mostly boilerplate, or unparseable).
pub fn extract(doc: &FetchedDocument) -> Option<String> {
    // 1. Readability, then selector heuristics
    let article = reader::extract(&doc.body_utf8, &doc.url_final)?;

    // 2. Plain text with entities decoded and whitespace collapsed
    let text = normalize_text(&article.text);

    // 3. Check if content should be rejected
    if reject::should_reject(&article.title, &text) {
        return None;
    }

    Some(compact(&text, MAX_ARTICLE_CHARS))
}
