use bytes::Bytes;
use chrono::Utc;
use reqwest::StatusCode;
use std::fs;
use url::Url;

use crate::extractor::{MAX_ARTICLE_CHARS, extract};
use crate::fetcher::types::{Charset, FetchedDocument};

#[test]
fn test_extract_article() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let text = extract(&create_test_document(html, "https://news.example/vivienda/1"))
        .expect("article should be extracted");

    assert!(text.contains("primer párrafo"));
    assert!(text.contains("segundo párrafo"));
    assert!(!text.contains("trackPageView"));
    assert!(!text.contains('<'));
    assert!(!text.contains("&amp;"));
}

#[test]
fn test_reject_cookie_wall() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/cookie_wall.html")
        .expect("Failed to read test fixture");

    let result = extract(&create_test_document(html, "https://news.example/muro"));
    assert!(result.is_none());
}

#[test]
fn test_minimal_valid_content() {
    let html = format!(
        r#"<!DOCTYPE html><html><head><title>Artículo válido</title></head><body><article><h1>Artículo válido</h1><p>{}</p></article></body></html>"#,
        "El mercado de la vivienda mantiene su ritmo de crecimiento en las grandes ciudades. ".repeat(20)
    );

    let text = extract(&create_test_document(html, "https://news.example/valido")).unwrap();
    assert!(text.chars().count() > 250);
    assert!(text.contains("mercado de la vivienda"));
}

#[test]
fn test_long_articles_are_capped() {
    let html = format!(
        "<html><head><title>Largo</title></head><body><article><p>{}</p></article></body></html>",
        "La compraventa de viviendas vuelve a crecer en el último trimestre del año. ".repeat(200)
    );

    let text = extract(&create_test_document(html, "https://news.example/largo")).unwrap();
    assert!(text.chars().count() <= MAX_ARTICLE_CHARS);
    assert!(text.ends_with('.'));
}

#[test]
fn test_malformed_html() {
    let html =
        "<html><head><title>Roto</title><body><p>Etiquetas sin cerrar<div>Más contenido".to_string();

    // Too short to keep, but must not panic.
    assert!(extract(&create_test_document(html, "https://news.example/roto")).is_none());
}

fn create_test_document(html: String, url: &str) -> FetchedDocument {
    FetchedDocument {
        url_final: Url::parse(url).unwrap(),
        status: StatusCode::OK,
        body_raw: Bytes::from(html.clone()),
        body_utf8: html,
        charset: Charset::Utf8,
        fetched_at: Utc::now(),
    }
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/[a-z]*"
        ) {
            // Should never panic regardless of input
            let _ = extract(&create_test_document(html, &url));
        }

        #[test]
        fn test_extract_output_is_plain_text(html in ".*") {
            if let Some(text) = extract(&create_test_document(html, "https://example.com")) {
                prop_assert!(text.chars().count() <= MAX_ARTICLE_CHARS);
                prop_assert!(!text.contains("  "));
            }
        }
    }
}
