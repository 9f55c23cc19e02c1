use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// --- Tables ---

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct NewsItem {
    pub id: Uuid,
    pub title: String,
    pub source: String,
    pub url: String, // unique
    pub published_at: Option<DateTime<Utc>>,
    pub category: String,
    pub domain: String,
    pub summary: Option<String>,
    pub raw_summary: Option<String>,
    pub adapted_summary: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    pub used_in_social: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsItem {
    pub fn is_pending_adaptation(&self) -> bool {
        self.adapted_summary.is_none()
    }
}
