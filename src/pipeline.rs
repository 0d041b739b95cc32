use crate::client::{NewsApiClient, NewsSource, TRENDING_QUERY};
use crate::config::Config;
use crate::enricher::SummaryEnricher;
use crate::filter;
use crate::summarizer::{GeminiClient, Summarizer};
use crate::types::{NewsError, RequestKind, Result, RetrievalRequest, RetrievalResult};
use tracing::{debug, error, info};

/// What to do when the curated-headlines endpoint answers with zero articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// One upstream call per request, whatever it returns.
    #[default]
    SingleAttempt,
    /// Retry an empty curated-headlines answer once through the
    /// relevance-search endpoint before giving up.
    SearchFallback,
}

/// Fetch, filter, enrich. All failures are captured into the returned
/// [`RetrievalResult`]; this never returns an error to the caller.
pub struct NewsRetrievalPipeline {
    source: Box<dyn NewsSource>,
    enricher: SummaryEnricher,
    policy: FetchPolicy,
}

impl NewsRetrievalPipeline {
    pub fn new(source: Box<dyn NewsSource>, enricher: SummaryEnricher) -> Self {
        Self {
            source,
            enricher,
            policy: FetchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Assemble the full pipeline from configuration. The news credential is
    /// required; a missing summarization credential is not an error, it just
    /// means every summary falls back to the article description.
    pub fn from_config(config: &Config) -> Result<Self> {
        let news_api_key = config
            .news_api_key
            .clone()
            .ok_or_else(|| NewsError::Config("NEWS_API_KEY is not set".to_string()))?;

        let summarizer = config
            .gemini_api_key
            .clone()
            .map(|key| Box::new(GeminiClient::new(key)) as Box<dyn Summarizer>);
        if summarizer.is_none() {
            info!("No summarization credential; summaries will use descriptions");
        }

        Ok(Self::new(
            Box::new(NewsApiClient::new(news_api_key)),
            SummaryEnricher::new(summarizer),
        ))
    }

    pub async fn run(&self, request: &RetrievalRequest) -> RetrievalResult {
        if let Err(e) = request.validate() {
            debug!("Rejecting request: {}", e);
            return RetrievalResult::failed(e.to_string());
        }

        let response = match self.source.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Upstream fetch failed: {}", e);
                return RetrievalResult::failed(e.to_string());
            }
        };

        let response = if response.articles.is_empty() {
            match self.fallback_request(request) {
                Some(fallback) => {
                    info!("Curated endpoint returned no articles, retrying via search");
                    match self.source.fetch(&fallback).await {
                        Ok(response) => response,
                        Err(e) => {
                            error!("Fallback fetch failed: {}", e);
                            return RetrievalResult::failed(e.to_string());
                        }
                    }
                }
                None => response,
            }
        } else {
            response
        };

        let articles = filter::apply(response.articles);

        let topic_hint = match request.kind {
            RequestKind::Category => request.category.as_deref(),
            _ => None,
        };
        let articles = self.enricher.process(articles, topic_hint).await;

        info!("Pipeline returning {} articles", articles.len());
        RetrievalResult::ok(articles)
    }

    /// Second-attempt request under [`FetchPolicy::SearchFallback`]. Only the
    /// curated-headlines shapes are retried; the search shapes already hit
    /// the relevance endpoint.
    fn fallback_request(&self, request: &RetrievalRequest) -> Option<RetrievalRequest> {
        if self.policy != FetchPolicy::SearchFallback {
            return None;
        }
        match request.kind {
            RequestKind::Headlines => Some(RetrievalRequest::search(
                TRENDING_QUERY,
                request.page,
                request.page_size,
            )),
            RequestKind::Category => Some(RetrievalRequest::search(
                request.category.clone()?,
                request.page,
                request.page_size,
            )),
            RequestKind::Hot | RequestKind::Search => None,
        }
    }
}
