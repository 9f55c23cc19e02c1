pub mod adapt;
pub mod classify;
pub mod date;
pub mod guard;
pub mod pipeline;
pub mod types;

pub use adapt::{SUMMARY_BUDGET, adapt_item};
pub use guard::{Guardrails, Verdict};
pub use pipeline::{Pipeline, PipelineError};
pub use types::{CandidateRecord, IngestAndAdaptSummary, IngestReport, RawEntry, SourceOutcome};
