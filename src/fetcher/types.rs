use bytes::Bytes;
use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use reqwest::StatusCode;
use url::Url;

/// Text encoding a body was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Windows1252,
    Iso885915,
    Other(&'static Encoding),
}

impl Charset {
    pub fn from_encoding(encoding: &'static Encoding) -> Self {
        if encoding == encoding_rs::UTF_8 {
            Self::Utf8
        } else if encoding == encoding_rs::WINDOWS_1252 {
            // encoding_rs maps ISO-8859-1 labels here too.
            Self::Windows1252
        } else if encoding == encoding_rs::ISO_8859_15 {
            Self::Iso885915
        } else {
            Self::Other(encoding)
        }
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            Self::Utf8 => encoding_rs::UTF_8,
            Self::Windows1252 => encoding_rs::WINDOWS_1252,
            Self::Iso885915 => encoding_rs::ISO_8859_15,
            Self::Other(encoding) => encoding,
        }
    }
}

/// What a fetch is expected to return; decides accepted content types and
/// where an in-document charset declaration is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Feed,
    Page,
}

impl DocumentKind {
    pub fn accepts(self, content_type: &str) -> bool {
        let content_type = content_type.to_ascii_lowercase();
        match self {
            // Plenty of feeds are served as text/html or text/plain.
            DocumentKind::Feed => [
                "xml",
                "rss",
                "atom",
                "text/html",
                "text/plain",
                "application/octet-stream",
            ]
            .iter()
            .any(|t| content_type.contains(t)),
            DocumentKind::Page => {
                content_type.contains("text/html") || content_type.contains("application/xhtml")
            }
        }
    }

    pub fn accept_header(self) -> &'static str {
        match self {
            DocumentKind::Feed => {
                "application/rss+xml,application/atom+xml,application/xml;q=0.9,text/xml;q=0.9,*/*;q=0.8"
            }
            DocumentKind::Page => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        }
    }
}

/// A fetched body decoded to UTF-8.
#[derive(Debug)]
pub struct FetchedDocument {
    pub url_final: Url,
    pub status: StatusCode,
    pub body_raw: Bytes,
    pub body_utf8: String,
    pub charset: Charset,
    pub fetched_at: DateTime<Utc>,
}
