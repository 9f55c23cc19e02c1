use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::config::{FeedSource, Order};
use crate::extractor::MAX_ARTICLE_CHARS;
use crate::fetcher::{FeedFetcher, FetchError};
use crate::ingest::{
    classify::classify,
    date,
    types::{CandidateRecord, IngestReport, RawEntry, SourceOutcome},
};
use crate::repositories::NewsStore;
use crate::text::{compact, normalize_optional, normalize_text};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Feed bodies shorter than this are replaced by the article page text when
/// the source allows it.
pub const MIN_BODY_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("news store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}

/// Ingestion and adaptation over one fetcher and one store.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn FeedFetcher>,
    store: Arc<dyn NewsStore>,
    concurrency: usize,
}

/// A feed entry after cleaning, before the guard.
#[derive(Debug, Clone)]
struct PreparedEntry {
    title: String,
    link: String,
    summary: Option<String>,
    raw_summary: Option<String>,
    content: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

impl PreparedEntry {
    fn from_raw(entry: RawEntry) -> Option<Self> {
        let title = normalize_text(entry.title.as_deref()?);
        let link = entry.link?.trim().to_string();
        if title.is_empty() || link.is_empty() {
            return None;
        }

        let raw_summary = entry.summary.filter(|s| !s.trim().is_empty());
        Some(Self {
            title,
            link,
            summary: normalize_optional(raw_summary.as_deref()),
            content: normalize_optional(entry.content.as_deref()),
            raw_summary,
            published_at: date::resolve(entry.published, entry.updated),
        })
    }
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, store: Arc<dyn NewsStore>) -> Self {
        Self {
            fetcher,
            store,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Upper bound on feeds fetched at the same time.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn NewsStore> {
        &self.store
    }

    /// Fetch every source and store the admitted, unseen entries.
    ///
    /// Feeds are fetched concurrently but processed in the order given. A
    /// source whose fetch fails is reported with `fetch_failed` and stores
    /// nothing; only a store failure aborts the run.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub async fn ingest(&self, sources: &[FeedSource]) -> Result<IngestReport, PipelineError> {
        let fetches = self.spawn_fetches(sources);
        let mut report = IngestReport::default();

        for (source, fetch) in sources.iter().zip(fetches) {
            let entries = match fetch.await {
                Ok(Ok(entries)) => entries,
                Ok(Err(e)) => {
                    warn!(source = %source.name, url = %source.url, error = %e, "feed fetch failed");
                    report.sources.insert(source.name.clone(), failed_outcome());
                    continue;
                }
                Err(e) => {
                    warn!(source = %source.name, error = %e, "feed fetch task aborted");
                    report.sources.insert(source.name.clone(), failed_outcome());
                    continue;
                }
            };

            let outcome = self.ingest_source(source, entries).await?;
            info!(
                source = %source.name,
                fetched = outcome.fetched,
                skipped = outcome.skipped,
                rejected = outcome.rejected,
                duplicates = outcome.duplicates,
                stored = outcome.stored,
                "source ingested"
            );
            report.sources.insert(source.name.clone(), outcome);
        }

        info!(
            stored = report.total_stored(),
            failed = report.failed_sources(),
            "ingest finished"
        );
        Ok(report)
    }

    fn spawn_fetches(
        &self,
        sources: &[FeedSource],
    ) -> Vec<JoinHandle<Result<Vec<RawEntry>, FetchError>>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        sources
            .iter()
            .map(|source| {
                let fetcher = Arc::clone(&self.fetcher);
                let semaphore = Arc::clone(&semaphore);
                let url = source.url.to_string();
                let span = info_span!("fetch_feed", source = %source.name);
                tokio::spawn(
                    async move {
                        let _permit = semaphore
                            .acquire_owned()
                            .await
                            .map_err(|e| FetchError::Unknown(e.to_string()))?;
                        fetcher.fetch_feed(&url).await
                    }
                    .instrument(span),
                )
            })
            .collect()
    }

    async fn ingest_source(
        &self,
        source: &FeedSource,
        entries: Vec<RawEntry>,
    ) -> Result<SourceOutcome, PipelineError> {
        let mut outcome = SourceOutcome {
            fetched: entries.len(),
            ..Default::default()
        };

        let mut prepared: Vec<PreparedEntry> = entries
            .into_iter()
            .filter_map(PreparedEntry::from_raw)
            .collect();
        outcome.skipped = outcome.fetched - prepared.len();

        if source.order == Order::Newest {
            // Stable: ties and undated entries keep feed order, undated last.
            prepared.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        }

        let guardrails = &source.guardrails;
        let mut admitted = 0;

        for entry in prepared {
            if admitted >= source.max_items {
                break;
            }

            if !guardrails.passes(&entry.title, entry.summary.as_deref(), Some(&entry.link)) {
                outcome.rejected += 1;
                continue;
            }
            admitted += 1;

            if self.store.exists_by_url(&entry.link).await? {
                outcome.duplicates += 1;
                continue;
            }

            let body = self.resolve_body(source, &entry).await;
            if body != entry.summary
                && !guardrails.passes(&entry.title, body.as_deref(), Some(&entry.link))
            {
                outcome.rejected += 1;
                continue;
            }

            let (category, tags) = classify(
                source.domain,
                &entry.title,
                body.as_deref(),
                source.default_category,
            );

            let record = CandidateRecord {
                title: entry.title,
                url: entry.link,
                summary: body,
                raw_summary: entry.raw_summary,
                published_at: entry.published_at,
                source: source.label.clone(),
                category: category.as_str().to_string(),
                domain: source.domain,
                tags,
            };

            match self.store.create_if_absent(&record).await? {
                Some(item) => {
                    debug!(id = %item.id, url = %item.url, category = %item.category, "stored news item");
                    outcome.stored += 1;
                }
                None => {
                    debug!(url = %record.url, "lost insert race, counted as duplicate");
                    outcome.duplicates += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Text stored as the item summary: the feed body when it is substantial,
    /// else the article page (if the source allows it), else the feed summary.
    async fn resolve_body(&self, source: &FeedSource, entry: &PreparedEntry) -> Option<String> {
        if let Some(content) = &entry.content
            && content.chars().count() >= MIN_BODY_CHARS
        {
            return Some(compact(content, MAX_ARTICLE_CHARS));
        }

        if source.fetch_articles {
            match self.fetcher.fetch_article(&entry.link).await {
                Ok(Some(text)) => return Some(text),
                Ok(None) => debug!(url = %entry.link, "article page has no usable text"),
                Err(e) => debug!(url = %entry.link, error = %e, "article fetch failed"),
            }
        }

        entry.summary.clone()
    }
}

fn failed_outcome() -> SourceOutcome {
    SourceOutcome {
        fetch_failed: true,
        ..Default::default()
    }
}
