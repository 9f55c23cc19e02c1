use crate::config::{Config, SourcesConfig};
use crate::fetcher::{FeedFetcher, FetchError, HttpFeedFetcher};
use crate::ingest::Pipeline;
use crate::repositories::{NewsStore, PgNewsRepository};
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NewsStore>,
    pub pipeline: Pipeline,
    pub sources: Arc<SourcesConfig>,
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        pool: Pool<Postgres>,
        config: &Config,
        sources: SourcesConfig,
    ) -> Result<Self, FetchError> {
        let fetcher = HttpFeedFetcher::with_timeout(config.fetch_timeout())?;
        Ok(Self::from_parts(
            Arc::new(PgNewsRepository::new(pool)),
            Arc::new(fetcher),
            sources,
            config,
        ))
    }

    pub fn from_parts(
        store: Arc<dyn NewsStore>,
        fetcher: Arc<dyn FeedFetcher>,
        sources: SourcesConfig,
        config: &Config,
    ) -> Self {
        let pipeline = Pipeline::new(fetcher, Arc::clone(&store))
            .with_concurrency(config.fetch_concurrency());
        Self {
            store,
            pipeline,
            sources: Arc::new(sources),
            admin_token: config.admin_token().map(Arc::from),
        }
    }
}
