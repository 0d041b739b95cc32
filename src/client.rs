use crate::types::{NewsApiResponse, NewsError, RequestKind, Result, RetrievalRequest};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
const USER_AGENT: &str = "palm-news/0.1";
const TIMEOUT_SECONDS: u64 = 30;

/// Country filter applied to the curated-headlines endpoint.
const HEADLINES_COUNTRY: &str = "us";

/// Disjunctive query used for the hot-topics view of the search endpoint.
pub const TRENDING_QUERY: &str = "trending OR viral OR \"breaking news\"";

/// How far back the search endpoint looks, in days.
const HOT_WINDOW_DAYS: i64 = 3;
const SEARCH_WINDOW_DAYS: i64 = 7;

/// Source of raw article pages. The pipeline only depends on this trait so
/// tests can substitute a canned source.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self, request: &RetrievalRequest) -> Result<NewsApiResponse>;
}

/// HTTP client for the hosted news provider. One instance is constructed per
/// pipeline invocation; no state is shared across requests.
pub struct NewsApiClient {
    http: Client,
    api_key: String,
    base_url: Url,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key: api_key.into(),
            base_url: Url::parse(NEWSAPI_BASE_URL).expect("valid base URL"),
        }
    }

    /// Point the client at a different provider host, for local stubs.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the upstream URL for a request. The credential travels in a
    /// header, never in the URL, so this is safe to log.
    pub fn endpoint(&self, request: &RetrievalRequest) -> Result<Url> {
        let page = request.page.to_string();
        let page_size = request.page_size.to_string();

        let mut url = match request.kind {
            RequestKind::Headlines | RequestKind::Category => self.path_url("top-headlines")?,
            RequestKind::Hot | RequestKind::Search => self.path_url("everything")?,
        };
        match request.kind {
            RequestKind::Headlines | RequestKind::Category => {
                let mut params = url.query_pairs_mut();
                params.append_pair("country", HEADLINES_COUNTRY);
                if let Some(category) = request.category.as_deref() {
                    params.append_pair("category", category);
                }
                params.append_pair("pageSize", &page_size);
                params.append_pair("page", &page);
            }
            RequestKind::Hot => {
                let from = window_start(HOT_WINDOW_DAYS);
                let mut params = url.query_pairs_mut();
                params.append_pair("q", TRENDING_QUERY);
                params.append_pair("from", &from);
                params.append_pair("sortBy", "popularity");
                params.append_pair("language", "en");
                params.append_pair("pageSize", &page_size);
                params.append_pair("page", &page);
            }
            RequestKind::Search => {
                let from = window_start(SEARCH_WINDOW_DAYS);
                let mut params = url.query_pairs_mut();
                params.append_pair("q", request.query.as_deref().unwrap_or_default());
                params.append_pair("from", &from);
                params.append_pair("sortBy", "popularity");
                params.append_pair("language", "en");
                params.append_pair("pageSize", &page_size);
                params.append_pair("page", &page);
            }
        }

        Ok(url)
    }

    /// Append `segment` to the base path without disturbing existing segments.
    fn path_url(&self, segment: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{segment}"))?)
    }

    async fn send(&self, request: &RetrievalRequest) -> Result<reqwest::Response> {
        let url = self.endpoint(request)?;
        debug!("Fetching news: {}", url);

        self.http
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| NewsError::Upstream {
                status: 0,
                message: format!("request failed: {e}"),
            })
    }

    /// Fetch and pass through the provider's status and raw body, for the
    /// proxy endpoint. Unparseable bodies become an empty object.
    pub async fn fetch_raw(&self, request: &RetrievalRequest) -> Result<(u16, serde_json::Value)> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or_else(|_| serde_json::json!({}));

        if status >= 400 {
            warn!("News provider returned HTTP {}", status);
        }
        Ok((status, body))
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch(&self, request: &RetrievalRequest) -> Result<NewsApiResponse> {
        let response = self.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<serde_json::Value>().await {
                Ok(body) => body
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("news provider returned HTTP {status}")),
                Err(_) => format!("news provider returned HTTP {status}"),
            };
            return Err(NewsError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<NewsApiResponse>().await?;
        debug!(
            "News provider returned {} articles (total {})",
            body.articles.len(),
            body.total_results.unwrap_or(0)
        );
        Ok(body)
    }
}

/// Start of the date window for the search endpoint, as a plain date.
fn window_start(days: i64) -> String {
    (Utc::now() - ChronoDuration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
