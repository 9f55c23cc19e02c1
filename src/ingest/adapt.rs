use tracing::{info, instrument};

use crate::config::FeedSource;
use crate::entities::NewsItem;
use crate::ingest::pipeline::{Pipeline, PipelineError};
use crate::ingest::types::IngestAndAdaptSummary;
use crate::text::{compact, normalize_optional};
use crate::tone;

/// Summary length handed to the tone adapter.
pub const SUMMARY_BUDGET: usize = 220;

/// Adapted summary for one stored item.
pub fn adapt_item(item: &NewsItem) -> String {
    let summary = item
        .summary
        .clone()
        .or_else(|| normalize_optional(item.raw_summary.as_deref()))
        .map(|s| compact(&s, SUMMARY_BUDGET));

    // Stable per item, spread across items.
    let seed = item.id.as_u128() as u64;
    tone::adapt(&item.title, summary.as_deref(), &item.category, seed)
}

impl Pipeline {
    /// Write an adapted summary for every item that still lacks one.
    /// Returns how many items this pass adapted.
    #[instrument(skip_all)]
    pub async fn adapt_pending(&self) -> Result<usize, PipelineError> {
        let pending = self.store().list_pending_adaptation().await?;
        let total = pending.len();

        let mut adapted = 0;
        for item in pending {
            let text = adapt_item(&item);
            if self.store().set_adapted_summary_if_absent(item.id, &text).await? {
                adapted += 1;
            }
        }

        info!(pending = total, adapted, "adaptation pass finished");
        Ok(adapted)
    }

    pub async fn ingest_and_adapt(
        &self,
        sources: &[FeedSource],
    ) -> Result<IngestAndAdaptSummary, PipelineError> {
        let report = self.ingest(sources).await?;
        let adapted = self.adapt_pending().await?;
        Ok(IngestAndAdaptSummary::new(report, adapted))
    }
}
