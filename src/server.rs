use crate::client::NewsApiClient;
use crate::config::Config;
use crate::pipeline::NewsRetrievalPipeline;
use crate::types::{RequestKind, RetrievalRequest};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/news", get(get_news))
        .route("/news/summarized", get(get_summarized_news))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Map the UI-facing query string onto an upstream request. Unknown types
/// fall back to plain headlines, matching what the pages expect.
fn request_from_query(params: &NewsQuery) -> RetrievalRequest {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(10);
    let category = params
        .category
        .clone()
        .unwrap_or_else(|| "general".to_string());

    match params.kind.as_deref() {
        Some("category") => RetrievalRequest::category(category, page, page_size),
        Some("hot") | Some("trending") => RetrievalRequest::hot(page, page_size),
        Some("search") if params.q.as_deref().is_some_and(|q| !q.is_empty()) => {
            RetrievalRequest::search(params.q.clone().unwrap_or_default(), page, page_size)
        }
        // Plain headlines share the curated shape and carry the defaulted
        // category, exactly like the category branch.
        _ => RetrievalRequest {
            category: Some(category),
            ..RetrievalRequest::headlines(page, page_size)
        },
    }
}

/// Proxy endpoint consumed by the UI pages. Passes the provider's status and
/// raw body through untouched so the pages see the same shape they would get
/// from the provider directly, without exposing the credential.
async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    debug!("News proxy called: {:?}", params);

    let Some(api_key) = state.config.news_api_key.clone() else {
        error!("NEWS_API_KEY not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": "API key not configured"})),
        );
    };

    let request = request_from_query(&params);
    let client = NewsApiClient::new(api_key);

    match client.fetch_raw(&request).await {
        Ok((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(body))
        }
        Err(e) => {
            error!("News proxy error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
        }
    }
}

/// Summarized retrieval: runs the full pipeline (fetch, filter, enrich) and
/// returns the uniform `{articles, success, error?}` shape. Clients are built
/// per request from configuration, so nothing is shared across requests.
async fn get_summarized_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    debug!("Summarized news called: {:?}", params);

    let pipeline = match NewsRetrievalPipeline::from_config(&state.config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Cannot build pipeline: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": "API key not configured"})),
            );
        }
    };

    let request = request_from_query(&params);
    let result = pipeline.run(&request).await;
    let body = serde_json::to_value(&result)
        .unwrap_or_else(|_| json!({"status": "error", "message": "serialization failed"}));
    (StatusCode::OK, Json(body))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}
