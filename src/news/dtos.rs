use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;
use utoipa::{IntoParams, ToSchema};

use crate::brands::{Domain, domain_for_brand};
use crate::category::Category;
use crate::ingest::date::parse_timestamp;
use crate::ingest::types::CandidateRecord;
use crate::repositories::NewsFilter;
use crate::text::{normalize_optional, normalize_text};

const MAX_URL_LEN: usize = 2048;
const MAX_TITLE_LEN: usize = 1000;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNewsRequest {
    pub title: String,
    pub source: String,
    pub url: String,
    pub category: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Summary as published, markup allowed.
    pub raw_summary: Option<String>,
    pub tags: Option<String>,
    /// Defaults to the category's domain, or `real_estate` for free-form
    /// categories.
    pub domain: Option<Domain>,
}

impl CreateNewsRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.title.len() > MAX_TITLE_LEN {
            return Err("Title too long".to_string());
        }
        if self.source.trim().is_empty() {
            return Err("Source cannot be empty".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("Category cannot be empty".to_string());
        }
        if self.url.len() > MAX_URL_LEN {
            return Err("URL too long".to_string());
        }
        let url = Url::parse(self.url.trim()).map_err(|_| "Invalid URL".to_string())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err("URL must use http or https".to_string());
        }
        if let (Some(category), Some(domain)) = (Category::parse(&self.category), self.domain)
            && category.domain() != domain
        {
            return Err(format!("Category {category} does not belong to domain {domain}"));
        }
        Ok(())
    }

    pub fn into_candidate(self) -> CandidateRecord {
        let category = Category::parse(&self.category);
        let domain = self
            .domain
            .or(category.map(Category::domain))
            .unwrap_or(Domain::RealEstate);

        CandidateRecord {
            title: normalize_text(&self.title),
            url: self.url.trim().to_string(),
            summary: normalize_optional(self.raw_summary.as_deref()),
            raw_summary: self.raw_summary,
            published_at: self.published_at,
            source: self.source.trim().to_string(),
            category: category
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| self.category.trim().to_string()),
            domain,
            tags: self.tags.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNewsQuery {
    pub category: Option<String>,
    /// Case-insensitive title search.
    pub q: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    /// `real_estate` or `tech`.
    pub domain: Option<String>,
    /// Brand key, an alias for `domain` (`althara`, `oxono`).
    pub brand: Option<String>,
    /// Only items without an adapted summary.
    pub pending: Option<bool>,
    pub limit: Option<i64>,
}

impl ListNewsQuery {
    pub fn into_filter(self) -> Result<NewsFilter, String> {
        let domain = match (self.domain.as_deref(), self.brand.as_deref()) {
            (Some(domain), brand) => {
                let domain =
                    Domain::parse(domain).ok_or_else(|| format!("Unknown domain: {domain}"))?;
                if let Some(brand) = brand
                    && domain_for_brand(brand) != Some(domain)
                {
                    return Err(format!("Brand {brand} does not match domain {domain}"));
                }
                Some(domain)
            }
            (None, Some(brand)) => {
                Some(domain_for_brand(brand).ok_or_else(|| format!("Unknown brand: {brand}"))?)
            }
            (None, None) => None,
        };

        Ok(NewsFilter {
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            query: self
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            from_date: parse_date_param("from_date", self.from_date.as_deref())?,
            to_date: parse_date_param("to_date", self.to_date.as_deref())?,
            domain,
            pending: self.pending,
            limit: self.limit,
        })
    }
}

fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| format!("Invalid {name}: {raw}")),
        None => Ok(None),
    }
}
