#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use url::Url;
use uuid::Uuid;

use newsdesk::{
    app_state::AppState,
    brands::Domain,
    category::Category,
    config::{Config, FeedSource, SourcesConfig},
    entities::NewsItem,
    fetcher::HttpFeedFetcher,
    ingest::CandidateRecord,
    repositories::{NewsFilter, NewsStore},
    server,
};

/// [`NewsStore`] over a vector, with the same dedup and adaptation guards as
/// the Postgres repository.
#[derive(Default)]
pub struct InMemoryNewsStore {
    items: Mutex<Vec<NewsItem>>,
}

impl InMemoryNewsStore {
    pub fn items(&self) -> Vec<NewsItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait]
impl NewsStore for InMemoryNewsStore {
    async fn exists_by_url(&self, url: &str) -> anyhow::Result<bool> {
        Ok(self.items.lock().unwrap().iter().any(|i| i.url == url))
    }

    async fn create_if_absent(
        &self,
        record: &CandidateRecord,
    ) -> anyhow::Result<Option<NewsItem>> {
        let mut items = self.items.lock().unwrap();
        if items.iter().any(|i| i.url == record.url) {
            return Ok(None);
        }
        let now = Utc::now();
        let item = NewsItem {
            id: Uuid::new_v4(),
            title: record.title.clone(),
            source: record.source.clone(),
            url: record.url.clone(),
            published_at: record.published_at,
            category: record.category.clone(),
            domain: record.domain.as_str().to_string(),
            summary: record.summary.clone(),
            raw_summary: record.raw_summary.clone(),
            adapted_summary: None,
            tags: record.tags.clone(),
            used_in_social: false,
            created_at: now,
            updated_at: now,
        };
        items.push(item.clone());
        Ok(Some(item))
    }

    async fn list_pending_adaptation(&self) -> anyhow::Result<Vec<NewsItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.adapted_summary.is_none())
            .cloned()
            .collect())
    }

    async fn set_adapted_summary_if_absent(&self, id: Uuid, adapted: &str) -> anyhow::Result<bool> {
        let mut items = self.items.lock().unwrap();
        match items
            .iter_mut()
            .find(|i| i.id == id && i.adapted_summary.is_none())
        {
            Some(item) => {
                item.adapted_summary = Some(adapted.to_string());
                item.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<NewsItem>> {
        Ok(self.items.lock().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn list(&self, filter: &NewsFilter) -> anyhow::Result<Vec<NewsItem>> {
        let query = filter.query.as_ref().map(|q| q.to_lowercase());
        let mut items: Vec<NewsItem> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| filter.category.as_ref().is_none_or(|c| &i.category == c))
            .filter(|i| {
                query
                    .as_ref()
                    .is_none_or(|q| i.title.to_lowercase().contains(q))
            })
            .filter(|i| {
                filter
                    .from_date
                    .is_none_or(|from| i.published_at.is_some_and(|p| p >= from))
            })
            .filter(|i| {
                filter
                    .to_date
                    .is_none_or(|to| i.published_at.is_some_and(|p| p <= to))
            })
            .filter(|i| filter.domain.is_none_or(|d| i.domain == d.as_str()))
            .filter(|i| {
                filter
                    .pending
                    .is_none_or(|pending| i.adapted_summary.is_none() == pending)
            })
            .cloned()
            .collect();

        items.sort_by(|a, b| match (a.published_at, b.published_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        });
        items.truncate(filter.effective_limit() as usize);
        Ok(items)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn feed_source(name: &str, url: &str, domain: Domain, max_items: usize) -> FeedSource {
    let category = match domain {
        Domain::RealEstate => Category::NoticiasInmobiliarias,
        Domain::Tech => Category::OtherTech,
    };
    FeedSource::new(name, Url::parse(url).unwrap(), domain, category, max_items)
}

pub fn test_app(store: Arc<InMemoryNewsStore>, sources: Vec<FeedSource>, config: &Config) -> Router {
    let state = AppState::from_parts(
        store,
        Arc::new(HttpFeedFetcher::default()),
        SourcesConfig::new(sources),
        config,
    );
    server::build_app(state, config)
}

/// An RSS 2.0 document with `(title, link, description)` items.
pub fn rss(items: &[(&str, &str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link, description)| {
            format!(
                "<item><title>{title}</title><link>{link}</link><description>{description}</description></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Feed</title><link>https://feed.example/</link><description>Prueba</description>{items}</channel></rss>"#
    )
}
