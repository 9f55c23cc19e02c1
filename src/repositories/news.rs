use crate::brands::Domain;
use crate::entities::NewsItem;
use crate::ingest::types::CandidateRecord;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

const NEWS_COLUMNS: &str = "id, title, source, url, published_at, category, domain, summary, \
     raw_summary, adapted_summary, tags, used_in_social, created_at, updated_at";

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 500;

/// Filters for [`NewsStore::list`]. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsFilter {
    pub category: Option<String>,
    /// Case-insensitive match against the title.
    pub query: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub domain: Option<Domain>,
    /// `Some(true)`: only items still waiting for an adapted summary.
    pub pending: Option<bool>,
    pub limit: Option<i64>,
}

impl NewsFilter {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

/// Persistence boundary for stored news items.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn exists_by_url(&self, url: &str) -> Result<bool>;

    /// Insert `record` unless an item with the same URL exists. Returns
    /// `None` when the URL was already taken, including by a concurrent insert.
    async fn create_if_absent(&self, record: &CandidateRecord) -> Result<Option<NewsItem>>;

    /// Items whose adapted summary is still absent, oldest first.
    async fn list_pending_adaptation(&self) -> Result<Vec<NewsItem>>;

    /// Write the adapted summary only while it is absent. Returns whether
    /// the row was updated.
    async fn set_adapted_summary_if_absent(&self, id: Uuid, adapted: &str) -> Result<bool>;

    async fn get(&self, id: Uuid) -> Result<Option<NewsItem>>;

    /// Newest first, undated items last.
    async fn list(&self, filter: &NewsFilter) -> Result<Vec<NewsItem>>;

    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct PgNewsRepository {
    pool: Pool<Postgres>,
}

impl PgNewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsStore for PgNewsRepository {
    async fn exists_by_url(&self, url: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM news WHERE url = $1)")
            .bind(url)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn create_if_absent(&self, record: &CandidateRecord) -> Result<Option<NewsItem>> {
        let sql = format!(
            r#"
            INSERT INTO news
                  (title, source, url, published_at, category, domain, summary, raw_summary, tags)
            VALUES ($1,    $2,     $3,  $4,           $5,       $6,     $7,      $8,          $9)
            ON CONFLICT (url) DO NOTHING
            RETURNING {NEWS_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, NewsItem>(&sql)
            .bind(&record.title)
            .bind(&record.source)
            .bind(&record.url)
            .bind(record.published_at)
            .bind(&record.category)
            .bind(record.domain.as_str())
            .bind(&record.summary)
            .bind(&record.raw_summary)
            .bind(&record.tags)
            .fetch_optional(&self.pool)
            .await;

        match inserted {
            Ok(item) => Ok(item),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_pending_adaptation(&self) -> Result<Vec<NewsItem>> {
        let sql = format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE adapted_summary IS NULL ORDER BY created_at, id"
        );
        let items = sqlx::query_as::<_, NewsItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn set_adapted_summary_if_absent(&self, id: Uuid, adapted: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE news
            SET adapted_summary = $2, updated_at = now()
            WHERE id = $1 AND adapted_summary IS NULL
            "#,
        )
        .bind(id)
        .bind(adapted)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: Uuid) -> Result<Option<NewsItem>> {
        let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
        let item = sqlx::query_as::<_, NewsItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn list(&self, filter: &NewsFilter) -> Result<Vec<NewsItem>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {NEWS_COLUMNS} FROM news WHERE TRUE"));

        if let Some(category) = &filter.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(query) = &filter.query {
            builder
                .push(" AND title ILIKE ")
                .push_bind(format!("%{}%", escape_like(query)));
        }
        if let Some(from) = filter.from_date {
            builder.push(" AND published_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to_date {
            builder.push(" AND published_at <= ").push_bind(to);
        }
        if let Some(domain) = filter.domain {
            builder.push(" AND domain = ").push_bind(domain.as_str());
        }
        match filter.pending {
            Some(true) => {
                builder.push(" AND adapted_summary IS NULL");
            }
            Some(false) => {
                builder.push(" AND adapted_summary IS NOT NULL");
            }
            None => {}
        }

        builder
            .push(" ORDER BY published_at DESC NULLS LAST, created_at DESC LIMIT ")
            .push_bind(filter.effective_limit());

        let items = builder
            .build_query_as::<NewsItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brands::Domain;
    use chrono::TimeZone;
    use sqlx::PgPool;

    async fn setup_test_db() -> Option<PgPool> {
        // Skip tests if TEST_DATABASE_URL is not set
        let database_url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("Skipping database tests: TEST_DATABASE_URL not set");
                return None;
            }
        };

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(pool)
    }

    fn candidate(url: &str) -> CandidateRecord {
        CandidateRecord {
            title: "Sube el precio de la vivienda".to_string(),
            url: url.to_string(),
            summary: Some("El precio medio crece un 5%.".to_string()),
            raw_summary: Some("<p>El precio medio crece un 5%.</p>".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
            source: "Prueba".to_string(),
            category: "PRECIOS_VIVIENDA".to_string(),
            domain: Domain::RealEstate,
            tags: None,
        }
    }

    fn unique_url() -> String {
        format!("https://news.example/{}", Uuid::new_v4())
    }

    #[test]
    fn test_effective_limit_is_clamped() {
        assert_eq!(NewsFilter::default().effective_limit(), DEFAULT_LIST_LIMIT);
        let filter = NewsFilter {
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(filter.effective_limit(), MAX_LIST_LIMIT);
        let filter = NewsFilter {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.effective_limit(), 1);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn test_create_if_absent_dedups_by_url() {
        let Some(pool) = setup_test_db().await else {
            return; // Skip test if database not available
        };
        let repo = PgNewsRepository::new(pool);
        let url = unique_url();

        let first = repo
            .create_if_absent(&candidate(&url))
            .await
            .expect("Failed to insert");
        let first = first.expect("first insert should store the item");
        assert!(first.adapted_summary.is_none());
        assert!(!first.used_in_social);
        assert_eq!(first.domain, "real_estate");

        let second = repo
            .create_if_absent(&candidate(&url))
            .await
            .expect("Failed to insert");
        assert!(second.is_none());
        assert!(repo.exists_by_url(&url).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_adapted_summary_only_once() {
        let Some(pool) = setup_test_db().await else {
            return; // Skip test if database not available
        };
        let repo = PgNewsRepository::new(pool);
        let item = repo
            .create_if_absent(&candidate(&unique_url()))
            .await
            .unwrap()
            .unwrap();

        assert!(repo.set_adapted_summary_if_absent(item.id, "uno").await.unwrap());
        assert!(!repo.set_adapted_summary_if_absent(item.id, "dos").await.unwrap());

        let stored = repo.get(item.id).await.unwrap().unwrap();
        assert_eq!(stored.adapted_summary.as_deref(), Some("uno"));
        assert!(
            !repo
                .list_pending_adaptation()
                .await
                .unwrap()
                .iter()
                .any(|i| i.id == item.id)
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_title_and_domain() {
        let Some(pool) = setup_test_db().await else {
            return; // Skip test if database not available
        };
        let repo = PgNewsRepository::new(pool);
        let marker = Uuid::new_v4().simple().to_string();
        let mut record = candidate(&unique_url());
        record.title = format!("Titular {marker}");
        repo.create_if_absent(&record).await.unwrap();

        let filter = NewsFilter {
            query: Some(marker.to_uppercase()),
            domain: Some(Domain::RealEstate),
            ..Default::default()
        };
        let items = repo.list(&filter).await.unwrap();
        assert_eq!(items.len(), 1);

        let filter = NewsFilter {
            query: Some(marker),
            domain: Some(Domain::Tech),
            ..Default::default()
        };
        assert!(repo.list(&filter).await.unwrap().is_empty());
    }
}
