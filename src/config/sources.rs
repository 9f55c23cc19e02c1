use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use url::Url;

use crate::brands::Domain;
use crate::category::Category;
use crate::config::ConfigError;
use crate::ingest::guard::Guardrails;

/// How a source's entries are ordered before the per-run cap is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Trust the order the feed publishes.
    #[default]
    Feed,
    /// Newest resolved date first; undated entries keep feed order at the end.
    Newest,
}

/// A configured feed, with defaults and guardrails already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSource {
    pub name: String,
    pub url: Url,
    /// Publisher label stored on each item.
    pub label: String,
    pub default_category: Category,
    pub domain: Domain,
    pub max_items: usize,
    pub order: Order,
    pub fetch_articles: bool,
    pub guardrails: Guardrails,
}

impl FeedSource {
    /// A permissive source with the given cap, for callers that build
    /// sources in code.
    pub fn new(
        name: impl Into<String>,
        url: Url,
        domain: Domain,
        default_category: Category,
        max_items: usize,
    ) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            url,
            default_category,
            domain,
            max_items,
            order: Order::Feed,
            fetch_articles: false,
            guardrails: Guardrails::permissive(),
        }
    }

    pub fn with_guardrails(mut self, guardrails: Guardrails) -> Self {
        self.guardrails = guardrails;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    guardrails: BTreeMap<Domain, Guardrails>,
    #[serde(default)]
    sources: Vec<SourceEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct Defaults {
    max_items: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    name: String,
    url: String,
    source: Option<String>,
    category: Category,
    domain: Domain,
    max_items: Option<usize>,
    #[serde(default)]
    order: Order,
    #[serde(default)]
    fetch_articles: bool,
    guardrails: Option<Guardrails>,
}

/// The feed catalogue loaded at start-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcesConfig {
    sources: Vec<FeedSource>,
}

impl SourcesConfig {
    pub fn new(sources: Vec<FeedSource>) -> Self {
        Self { sources }
    }

    /// Read and validate the TOML catalogue at `path`.
    pub fn load(path: &Path, default_max_items: usize) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, default_max_items)
    }

    pub fn from_toml_str(raw: &str, default_max_items: usize) -> Result<Self, ConfigError> {
        let file: SourcesFile = toml::from_str(raw)?;
        let fallback_cap = file.defaults.max_items.unwrap_or(default_max_items);

        let mut seen = HashSet::new();
        let mut sources = Vec::with_capacity(file.sources.len());
        for entry in file.sources {
            let name = entry.name.trim().to_string();
            let invalid = |reason: &str| ConfigError::InvalidSource {
                name: name.clone(),
                reason: reason.to_string(),
            };

            if name.is_empty() {
                return Err(invalid("name must not be empty"));
            }
            if !seen.insert(name.clone()) {
                return Err(invalid("duplicate source name"));
            }
            let url = Url::parse(entry.url.trim()).map_err(|e| invalid(&e.to_string()))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid("url must use http or https"));
            }
            let max_items = entry.max_items.unwrap_or(fallback_cap);
            if max_items == 0 {
                return Err(invalid("max_items must be greater than zero"));
            }
            if entry.category.domain() != entry.domain {
                return Err(invalid("category does not belong to the source domain"));
            }

            let guardrails = entry
                .guardrails
                .or_else(|| file.guardrails.get(&entry.domain).cloned())
                .unwrap_or_default();
            let label = entry
                .source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| name.clone());

            sources.push(FeedSource {
                name,
                url,
                label,
                default_category: entry.category,
                domain: entry.domain,
                max_items,
                order: entry.order,
                fetch_articles: entry.fetch_articles,
                guardrails,
            });
        }

        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Sources of one domain, or all of them.
    pub fn select(&self, domain: Option<Domain>) -> Vec<FeedSource> {
        self.sources
            .iter()
            .filter(|s| domain.is_none_or(|d| s.domain == d))
            .cloned()
            .collect()
    }

    /// Same sources with every cap replaced.
    pub fn with_cap(mut self, max_items: usize) -> Self {
        for source in &mut self.sources {
            source.max_items = max_items;
        }
        self
    }
}
