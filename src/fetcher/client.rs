use crate::extractor;
use crate::fetcher::{
    errors::FetchError,
    parse::parse_feed,
    pipeline::process_response,
    types::{DocumentKind, FetchedDocument},
};
use crate::ingest::types::RawEntry;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsdeskBot/0.1; +https://newsdesk.example.com)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

static HTTP_CLIENT: Lazy<Client> =
    Lazy::new(|| build_client(DEFAULT_TIMEOUT).expect("Failed to build HTTP client"));

fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    ClientBuilder::new()
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}

/// Source of feed entries and article bodies for the ingestion pipeline.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch and parse one feed, entries in feed order.
    async fn fetch_feed(&self, url: &str) -> Result<Vec<RawEntry>, FetchError>;

    /// Fetch an article page and extract its readable text, if any.
    async fn fetch_article(&self, url: &str) -> Result<Option<String>, FetchError>;
}

/// [`FeedFetcher`] over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self {
            client: get_client().clone(),
        }
    }
}

impl HttpFeedFetcher {
    /// A fetcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    #[instrument(skip(self))]
    async fn fetch_feed(&self, url: &str) -> Result<Vec<RawEntry>, FetchError> {
        let document = fetch_with(&self.client, url, DocumentKind::Feed).await?;
        let entries = parse_feed(&document.body_utf8)?;
        debug!(entries = entries.len(), charset = ?document.charset, "parsed feed");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn fetch_article(&self, url: &str) -> Result<Option<String>, FetchError> {
        let document = fetch_with(&self.client, url, DocumentKind::Page).await?;
        Ok(extractor::extract(&document))
    }
}

/// Fetch `url` with the shared client.
pub async fn fetch(url: &str, kind: DocumentKind) -> Result<FetchedDocument, FetchError> {
    fetch_with(&HTTP_CLIENT, url, kind).await
}

#[instrument(skip_all, fields(url = %url, kind = ?kind))]
async fn fetch_with(
    client: &Client,
    url: &str,
    kind: DocumentKind,
) -> Result<FetchedDocument, FetchError> {
    let parsed_url = url::Url::parse(url)?;

    let response = client
        .get(parsed_url)
        .header(reqwest::header::ACCEPT, kind.accept_header())
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or(match kind {
            DocumentKind::Feed => "application/xml",
            DocumentKind::Page => "text/html",
        })
        .to_string();

    if !kind.accepts(&content_type) {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check body size after download (in case Content-Length was missing)
    if body_bytes.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    Ok(process_response(
        final_url,
        status,
        body_bytes,
        &content_type,
        kind,
    ))
}
