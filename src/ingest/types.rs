use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::brands::Domain;

/// One item as read from a feed, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// `<description>` / `<summary>`, usually markup.
    pub summary: Option<String>,
    /// `<content:encoded>` / `<content>`, when the feed carries the full body.
    pub content: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// A cleaned, admitted entry ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
    pub raw_summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
    pub category: String,
    pub domain: Domain,
    pub tags: Option<String>,
}

/// Counters for one source in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SourceOutcome {
    pub fetched: usize,
    pub skipped: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub stored: usize,
    pub fetch_failed: bool,
}

/// Result of one ingestion run, keyed by source name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub sources: BTreeMap<String, SourceOutcome>,
}

impl IngestReport {
    /// Newly stored items per source, the figure callers report.
    pub fn stored_by_source(&self) -> BTreeMap<String, usize> {
        self.sources
            .iter()
            .map(|(name, outcome)| (name.clone(), outcome.stored))
            .collect()
    }

    pub fn total_stored(&self) -> usize {
        self.sources.values().map(|o| o.stored).sum()
    }

    /// Sources that contributed at least one new item.
    pub fn sources_with_new_items(&self) -> usize {
        self.sources.values().filter(|o| o.stored > 0).count()
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.values().filter(|o| o.fetch_failed).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestAndAdaptSummary {
    pub report: IngestReport,
    pub adapted: usize,
    pub message: String,
}

impl IngestAndAdaptSummary {
    pub fn new(report: IngestReport, adapted: usize) -> Self {
        let message = format!(
            "Ingested {} new items from {} sources, adapted {} items",
            report.total_stored(),
            report.sources_with_new_items(),
            adapted
        );
        Self {
            report,
            adapted,
            message,
        }
    }
}
