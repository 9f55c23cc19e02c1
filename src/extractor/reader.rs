use readability::extractor;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Title and body text of an article page.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleText {
    pub title: String,
    pub text: String,
}

// Elements whose text never belongs to the article body.
const SKIPPED_ELEMENTS: [&str; 8] = [
    "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript",
];

const ARTICLE_SELECTORS: [&str; 9] = [
    "article",
    ".article-body",
    ".article-content",
    ".post-content",
    ".entry-content",
    "[role='article']",
    "main article",
    "main",
    "[role='main']",
];

const MIN_BLOCK_CHARS: usize = 300;

pub fn extract(html: &str, url: &Url) -> Option<ArticleText> {
    // Try readability first
    if let Ok(article) = extractor::extract(&mut html.as_bytes(), url)
        && !article.text.trim().is_empty()
    {
        return Some(ArticleText {
            title: article.title,
            text: article.text,
        });
    }

    // Fallback to basic scraping if readability fails
    fallback_extract(html)
}

fn fallback_extract(html: &str) -> Option<ArticleText> {
    let document = Html::parse_document(html);
    let text = extract_main_content(&document);
    if text.trim().is_empty() {
        return None;
    }
    Some(ArticleText {
        title: extract_title(&document).unwrap_or_default(),
        text,
    })
}

fn extract_title(document: &Html) -> Option<String> {
    ["meta[property='og:title']", "title", "h1"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document.select(&selector).find_map(|element| {
                let title = match element.value().attr("content") {
                    Some(content) => content.trim().to_string(),
                    None => element.text().collect::<String>().trim().to_string(),
                };
                (!title.is_empty()).then_some(title)
            })
        })
}

fn extract_main_content(document: &Html) -> String {
    for selector_str in ARTICLE_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str)
            && let Some(element) = document.select(&selector).next()
        {
            let text = visible_text(element);
            if !text.trim().is_empty() {
                return text;
            }
        }
    }

    // Any content-looking div with a substantial amount of text
    if let Ok(selector) = Selector::parse("div[class*='content'], div[class*='article'], div[class*='post'], div[class*='entry']")
        && let Some(text) = document
            .select(&selector)
            .map(visible_text)
            .find(|t| t.chars().count() > MIN_BLOCK_CHARS)
    {
        return text;
    }

    // Last resort: the whole body without boilerplate elements
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .map(visible_text)
        .unwrap_or_default()
}

/// Text of `element`, skipping navigation, scripts and similar chrome.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if !hidden && !text.trim().is_empty() {
            parts.push(text.trim());
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_skips_chrome() {
        let html = r#"<html><head><title>Portada</title><script>var x = 1;</script></head>
<body><nav>Inicio | Vivienda</nav><div class="post-content"><p>Primer párrafo.</p>
<script>track()</script><p>Segundo párrafo.</p></div><footer>Aviso legal</footer></body></html>"#;
        let article = fallback_extract(html).unwrap();
        assert_eq!(article.title, "Portada");
        assert_eq!(article.text, "Primer párrafo. Segundo párrafo.");
    }

    #[test]
    fn test_fallback_prefers_og_title() {
        let html = r#"<html><head><meta property="og:title" content="Titular OG"><title>Otro</title></head>
<body><article>Texto del artículo</article></body></html>"#;
        let article = fallback_extract(html).unwrap();
        assert_eq!(article.title, "Titular OG");
        assert_eq!(article.text, "Texto del artículo");
    }

    #[test]
    fn test_fallback_empty_page() {
        assert_eq!(fallback_extract("<html><body><nav>menu</nav></body></html>"), None);
    }
}
