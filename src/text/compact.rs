/// Words that read badly at the end of a cut ("acceso efectivo a").
pub const SPANISH_DANGLING_WORDS: &[&str] = &[
    "a", "de", "en", "y", "o", "u", "con", "por", "para", "al", "del", "un", "una", "el", "la",
    "los", "las",
];

/// Tuning for [`compact_with`].
#[derive(Debug, Clone, Copy)]
pub struct CompactOptions {
    /// A sentence cut must keep at least this share of the budget.
    pub min_sentence_ratio: f32,
    /// Trailing words dropped after a word-boundary cut.
    pub dangling_words: &'static [&'static str],
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            min_sentence_ratio: 0.5,
            dangling_words: SPANISH_DANGLING_WORDS,
        }
    }
}

/// Truncate `text` to at most `budget` characters with the default options.
pub fn compact(text: &str, budget: usize) -> String {
    compact_with(text, budget, CompactOptions::default())
}

/// Truncate `text` to at most `budget` characters.
///
/// Text that already fits is returned unchanged. Otherwise the cut prefers the
/// last sentence end inside the budget, then the last word boundary, then a
/// hard cut. Lengths are counted in characters, not bytes.
pub fn compact_with(text: &str, budget: usize, options: CompactOptions) -> String {
    let total = text.chars().count();
    if total <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let window = &chars[..budget];
    // The character right after the window tells whether the window itself
    // ends on a boundary.
    let next = chars.get(budget).copied();

    if let Some(cut) = sentence_cut(window, next, budget, options.min_sentence_ratio) {
        return cut;
    }
    if let Some(cut) = word_cut(window, next, options.dangling_words) {
        return cut;
    }
    window.iter().collect()
}

fn sentence_cut(
    window: &[char],
    next: Option<char>,
    budget: usize,
    min_ratio: f32,
) -> Option<String> {
    let min_len = (budget as f32 * min_ratio).ceil() as usize;

    let end = (0..window.len()).rev().find(|&i| {
        if !matches!(window[i], '.' | '?' | '!') {
            return false;
        }
        let follower = window.get(i + 1).copied().or(next);
        follower.is_none_or(char::is_whitespace)
    })?;

    let cut: String = window[..=end].iter().collect();
    let cut = cut.trim().to_string();
    (cut.chars().count() >= min_len.max(1)).then_some(cut)
}

fn word_cut(window: &[char], next: Option<char>, dangling: &[&str]) -> Option<String> {
    let candidate: String = if next.is_some_and(char::is_whitespace) {
        window.iter().collect()
    } else {
        let last_space = window.iter().rposition(|c| c.is_whitespace())?;
        window[..last_space].iter().collect()
    };

    let mut words: Vec<&str> = candidate.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    while words.len() > 1
        && words
            .last()
            .is_some_and(|w| dangling.iter().any(|d| d.eq_ignore_ascii_case(w)))
    {
        words.pop();
    }
    Some(words.join(" "))
}


#[cfg(all(test, feature = "fuzz"))]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn output_never_exceeds_budget(text in ".{0,300}", budget in 0usize..120) {
            let out = compact(&text, budget);
            prop_assert!(out.chars().count() <= budget);
            if text.chars().count() <= budget {
                prop_assert_eq!(out, text);
            }
        }
    }
}
