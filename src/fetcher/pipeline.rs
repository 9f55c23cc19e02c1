use crate::fetcher::types::{Charset, DocumentKind, FetchedDocument};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static XML_PROLOG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*<\?xml[^>]*?\?>"#).unwrap());

static XML_ENCODING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)encoding\s*=\s*["']([^"']+)["']"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

const SNIFF_LEN: usize = 4096;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: Bytes,
    content_type: &str,
    kind: DocumentKind,
) -> FetchedDocument {
    let charset = detect_charset(content_type, &body_bytes, kind);
    let decoded = decode_to_utf8(&body_bytes, charset);
    let body_utf8 = match kind {
        DocumentKind::Feed => rewrite_xml_prolog(&decoded).into_owned(),
        DocumentKind::Page => decoded,
    };

    FetchedDocument {
        url_final,
        status,
        body_raw: body_bytes,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    }
}

fn encoding_for(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().to_lowercase().as_bytes())
}

pub(crate) fn detect_charset(content_type: &str, body_bytes: &[u8], kind: DocumentKind) -> Charset {
    // 1. A byte order mark is authoritative.
    if let Some((encoding, _)) = Encoding::for_bom(body_bytes) {
        return Charset::from_encoding(encoding);
    }

    // 2. Content-Type header
    if let Some(encoding) = CHARSET_REGEX
        .captures(content_type)
        .and_then(|c| c.get(1))
        .and_then(|m| encoding_for(m.as_str()))
    {
        return Charset::from_encoding(encoding);
    }

    // 3. In-document declaration within the first 4KB
    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_LEN)];
    let search_str = String::from_utf8_lossy(search_bytes);
    let declared = match kind {
        DocumentKind::Feed => XML_PROLOG_REGEX
            .find(&search_str)
            .and_then(|prolog| XML_ENCODING_REGEX.captures(prolog.as_str()))
            .and_then(|c| c.get(1))
            .and_then(|m| encoding_for(m.as_str())),
        DocumentKind::Page => META_CHARSET_REGEX
            .captures(&search_str)
            .and_then(|c| c.get(1))
            .and_then(|m| encoding_for(m.as_str())),
    };
    if let Some(encoding) = declared {
        return Charset::from_encoding(encoding);
    }

    // 4. Heuristic detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, search_bytes.len() == body_bytes.len());
    Charset::from_encoding(detector.guess(None, true))
}

fn decode_to_utf8(body_bytes: &[u8], charset: Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);
    if had_errors {
        warn!(
            encoding = encoding.name(),
            "body contained malformed sequences, replaced"
        );
    }
    decoded.into_owned()
}

/// Point the XML declaration at UTF-8 so the parser does not re-decode
/// already decoded text.
fn rewrite_xml_prolog(body: &str) -> Cow<'_, str> {
    let Some(prolog) = XML_PROLOG_REGEX.find(body) else {
        return Cow::Borrowed(body);
    };
    let rewritten = XML_ENCODING_REGEX.replace(prolog.as_str(), r#"encoding="UTF-8""#);
    if rewritten == prolog.as_str() {
        return Cow::Borrowed(body);
    }
    Cow::Owned(format!(
        "{}{}{}",
        &body[..prolog.start()],
        rewritten,
        &body[prolog.end()..]
    ))
}
