use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

use crate::brands::{Domain, domain_for_brand};
use crate::ingest::types::{IngestAndAdaptSummary, IngestReport, SourceOutcome};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngestQuery {
    /// Restrict the run to one domain (`real_estate`, `tech`) or brand.
    pub domain: Option<String>,
}

impl IngestQuery {
    pub fn domain(&self) -> Result<Option<Domain>, String> {
        match self.domain.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => Domain::parse(raw)
                .or_else(|| domain_for_brand(raw))
                .map(Some)
                .ok_or_else(|| format!("Unknown domain: {raw}")),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Newly stored items per source.
    pub ingested: BTreeMap<String, usize>,
    pub total: usize,
    /// Detailed counters per source.
    pub sources: BTreeMap<String, SourceOutcome>,
}

impl From<IngestReport> for IngestResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            ingested: report.stored_by_source(),
            total: report.total_stored(),
            sources: report.sources,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdaptResponse {
    pub adapted: usize,
    pub message: String,
}

impl AdaptResponse {
    pub fn new(adapted: usize) -> Self {
        Self {
            adapted,
            message: format!("Adapted {adapted} news items"),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestAndAdaptResponse {
    pub status: String,
    pub ingested: usize,
    pub adapted: usize,
    /// Sources that contributed at least one new item.
    pub sources_processed: usize,
    pub per_source: BTreeMap<String, usize>,
    pub message: String,
}

impl From<IngestAndAdaptSummary> for IngestAndAdaptResponse {
    fn from(summary: IngestAndAdaptSummary) -> Self {
        Self {
            status: "ok".to_string(),
            ingested: summary.report.total_stored(),
            adapted: summary.adapted,
            sources_processed: summary.report.sources_with_new_items(),
            per_source: summary.report.stored_by_source(),
            message: summary.message,
        }
    }
}
