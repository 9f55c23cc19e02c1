use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    entities::NewsItem,
    error::{ErrorResponse, error_response},
    news::dtos::{CreateNewsRequest, ListNewsQuery},
};

/// Create a news item
#[utoipa::path(
    post,
    path = "/api/news",
    tag = "news",
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "News item created", body = NewsItem),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "A news item with this URL already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_news(
    State(state): State<AppState>,
    Json(payload): Json<CreateNewsRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    let record = payload.into_candidate();
    match state.store.create_if_absent(&record).await {
        Ok(Some(item)) => (StatusCode::CREATED, Json(item)).into_response(),
        Ok(None) => error_response(
            StatusCode::CONFLICT,
            "A news item with this URL already exists",
        ),
        Err(e) => {
            error!(error = %e, url = %record.url, "failed to create news item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

/// List news items, newest first
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    params(ListNewsQuery),
    responses(
        (status = 200, description = "Matching news items", body = Vec<NewsItem>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_news(State(state): State<AppState>, Query(query): Query<ListNewsQuery>) -> Response {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error),
    };

    match state.store.list(&filter).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list news items");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

/// Get one news item
#[utoipa::path(
    get,
    path = "/api/news/{id}",
    tag = "news",
    params(("id" = Uuid, Path, description = "News item id")),
    responses(
        (status = 200, description = "The news item", body = NewsItem),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_news(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.store.get(id).await {
        Ok(Some(item)) => Json(item).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "News item not found"),
        Err(e) => {
            error!(error = %e, %id, "failed to load news item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        brands::Domain,
        config::{Config, SourcesConfig},
        fetcher::HttpFeedFetcher,
        repositories::news::MockNewsStore,
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::Request,
        routing::get,
    };
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_app(store: MockNewsStore) -> Router {
        let state = AppState::from_parts(
            Arc::new(store),
            Arc::new(HttpFeedFetcher::default()),
            SourcesConfig::default(),
            &Config::default(),
        );

        Router::new()
            .route("/api/news", get(list_news).post(create_news))
            .route("/api/news/{id}", get(get_news))
            .with_state(state)
    }

    fn news_item(id: Uuid) -> NewsItem {
        NewsItem {
            id,
            title: "Sube el precio de la vivienda".to_string(),
            source: "Idealista".to_string(),
            url: "https://www.idealista.com/news/1".to_string(),
            published_at: None,
            category: "PRECIOS_VIVIENDA".to_string(),
            domain: "real_estate".to_string(),
            summary: None,
            raw_summary: None,
            adapted_summary: None,
            tags: None,
            used_in_social: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/news")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_body() -> Value {
        serde_json::json!({
            "title": "Sube el precio de la vivienda",
            "source": "Idealista",
            "url": "https://www.idealista.com/news/1",
            "category": "PRECIOS_VIVIENDA"
        })
    }

    #[tokio::test]
    async fn test_create_news_returns_created() {
        let mut store = MockNewsStore::new();
        store
            .expect_create_if_absent()
            .returning(|_| Ok(Some(news_item(Uuid::new_v4()))));

        let response = create_test_app(store)
            .oneshot(create_request(valid_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["adapted_summary"], Value::Null);
        assert_eq!(json["used_in_social"], false);
    }

    #[tokio::test]
    async fn test_create_news_duplicate_url_conflicts() {
        let mut store = MockNewsStore::new();
        store.expect_create_if_absent().returning(|_| Ok(None));

        let response = create_test_app(store)
            .oneshot(create_request(valid_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_news_validation_error() {
        let mut body = valid_body();
        body["url"] = Value::from("not a url");

        let response = create_test_app(MockNewsStore::new())
            .oneshot(create_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_news_database_error() {
        let mut store = MockNewsStore::new();
        store
            .expect_create_if_absent()
            .returning(|_| Err(anyhow::anyhow!("Database insert failed")));

        let response = create_test_app(store)
            .oneshot(create_request(valid_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_news_passes_brand_filter() {
        let mut store = MockNewsStore::new();
        store
            .expect_list()
            .withf(|filter| filter.domain == Some(Domain::Tech) && filter.pending == Some(true))
            .returning(|_| Ok(vec![]));

        let request = Request::builder()
            .uri("/api/news?brand=oxono&pending=true")
            .body(Body::empty())
            .unwrap();
        let response = create_test_app(store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_news_rejects_unknown_domain() {
        let request = Request::builder()
            .uri("/api/news?domain=sports")
            .body(Body::empty())
            .unwrap();
        let response = create_test_app(MockNewsStore::new())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_news_found_and_missing() {
        let id = Uuid::new_v4();
        let mut store = MockNewsStore::new();
        store
            .expect_get()
            .returning(move |requested| Ok((requested == id).then(|| news_item(id))));
        let app = create_test_app(store);

        let request = Request::builder()
            .uri(format!("/api/news/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri(format!("/api/news/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
