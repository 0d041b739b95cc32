use serde::{Deserialize, Serialize};

/// Title the upstream provider substitutes when an article was withdrawn.
pub const REMOVED_TITLE: &str = "[Removed]";

/// Summary text used when the summarization provider is unavailable or failed
/// and the article carries no description of its own.
pub const FALLBACK_SUMMARY: &str = "Summary not available";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A single provider article. The provider populates fields inconsistently,
/// so everything is optional here and presence checks live in the filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
    /// Set by the enrichment step; never present in provider payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Loosely-typed upstream response envelope. Error responses reuse the same
/// shape with `code`/`message` set instead of `articles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsApiResponse {
    pub status: Option<String>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<u32>,
    #[serde(default)]
    pub articles: Vec<Article>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Headlines,
    Category,
    Hot,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    pub kind: RequestKind,
    pub category: Option<String>,
    pub query: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl RetrievalRequest {
    pub fn headlines(page: u32, page_size: u32) -> Self {
        Self {
            kind: RequestKind::Headlines,
            category: None,
            query: None,
            page,
            page_size,
        }
    }

    pub fn category(category: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            kind: RequestKind::Category,
            category: Some(category.into()),
            query: None,
            page,
            page_size,
        }
    }

    pub fn hot(page: u32, page_size: u32) -> Self {
        Self {
            kind: RequestKind::Hot,
            category: None,
            query: None,
            page,
            page_size,
        }
    }

    pub fn search(query: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            kind: RequestKind::Search,
            category: None,
            query: Some(query.into()),
            page,
            page_size,
        }
    }

    /// Check the per-kind field requirements before any network call is made.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(NewsError::Validation("page must be >= 1".to_string()));
        }
        match self.kind {
            RequestKind::Category if !is_present(&self.category) => Err(NewsError::Validation(
                "category requests require a category".to_string(),
            )),
            RequestKind::Search if !is_present(&self.query) => Err(NewsError::Validation(
                "search requests require a non-empty query".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Uniform result shape returned to the pipeline's caller. The pipeline never
/// raises past this boundary; failures land here as `success: false`.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    pub articles: Vec<Article>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RetrievalResult {
    pub fn ok(articles: Vec<Article>) -> Self {
        Self {
            articles,
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            success: false,
            error: Some(message.into()),
        }
    }
}

/// True when an optional provider field holds a non-blank value.
pub(crate) fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("summarization failed: {0}")]
    Summarization(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_deserializes_provider_field_names() {
        let raw = r#"{
            "source": {"id": null, "name": "Example Times"},
            "author": "A. Reporter",
            "title": "Something happened",
            "description": "A short description",
            "url": "https://example.com/a",
            "urlToImage": "https://example.com/a.jpg",
            "publishedAt": "2025-01-02T03:04:05Z",
            "content": "Full text"
        }"#;
        let article: Article = serde_json::from_str(raw).unwrap();
        assert_eq!(article.source.name.as_deref(), Some("Example Times"));
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(article.published_at.as_deref(), Some("2025-01-02T03:04:05Z"));
        assert!(article.summary.is_none());
    }

    #[test]
    fn article_with_missing_fields_still_deserializes() {
        let article: Article = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(article.title.as_deref(), Some("Only a title"));
        assert!(article.url.is_none());
        assert!(article.source.name.is_none());
    }

    #[test]
    fn summary_is_not_serialized_when_absent() {
        let article = Article {
            title: Some("t".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&article).unwrap();
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn category_request_requires_category() {
        let mut request = RetrievalRequest::category("technology", 1, 10);
        assert!(request.validate().is_ok());

        request.category = None;
        assert!(matches!(request.validate(), Err(NewsError::Validation(_))));

        request.category = Some("   ".to_string());
        assert!(matches!(request.validate(), Err(NewsError::Validation(_))));
    }

    #[test]
    fn search_request_requires_query() {
        let mut request = RetrievalRequest::search("rust", 1, 10);
        assert!(request.validate().is_ok());

        request.query = Some(String::new());
        assert!(matches!(request.validate(), Err(NewsError::Validation(_))));
    }

    #[test]
    fn page_zero_is_rejected() {
        let request = RetrievalRequest::headlines(0, 10);
        assert!(matches!(request.validate(), Err(NewsError::Validation(_))));
    }

    #[test]
    fn upstream_response_tolerates_error_bodies() {
        let raw = r#"{"status": "error", "code": "apiKeyInvalid", "message": "bad key"}"#;
        let response: NewsApiResponse = serde_json::from_str(raw).unwrap();
        assert!(response.articles.is_empty());
        assert_eq!(response.message.as_deref(), Some("bad key"));
    }
}
