use crate::summarizer::Summarizer;
use crate::types::{is_present, Article, FALLBACK_SUMMARY};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Upper bound on remote summarization calls per batch. Keeps latency bounded
/// and stays inside the provider's free-tier rate limit.
pub const SUMMARY_LIMIT: usize = 3;

/// Pause between consecutive summarization calls.
const SUMMARY_COOLDOWN: Duration = Duration::from_secs(1);

/// Fills the `summary` field of a batch of articles. Only the first
/// [`SUMMARY_LIMIT`] articles go to the remote summarizer, one at a time with
/// a cooldown in between; everything else falls back to the description.
pub struct SummaryEnricher {
    summarizer: Option<Box<dyn Summarizer>>,
    cooldown: Duration,
}

impl SummaryEnricher {
    /// `None` means summarization is unavailable (no credential); every
    /// article then gets the fallback summary without any remote call.
    pub fn new(summarizer: Option<Box<dyn Summarizer>>) -> Self {
        Self {
            summarizer,
            cooldown: SUMMARY_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Returns the same number of articles it received, in the same order,
    /// each with a populated `summary`. A failed summarization never affects
    /// the rest of the batch.
    pub async fn process(&self, mut articles: Vec<Article>, topic_hint: Option<&str>) -> Vec<Article> {
        let remote = match &self.summarizer {
            Some(_) => articles.len().min(SUMMARY_LIMIT),
            None => 0,
        };
        debug!(
            "Enriching {} articles ({} via remote summarizer)",
            articles.len(),
            remote
        );

        for (index, article) in articles.iter_mut().enumerate() {
            let remote_summary = if index < remote {
                if index > 0 {
                    sleep(self.cooldown).await;
                }
                match (self.summarizer.as_deref(), candidate_text(article)) {
                    (Some(summarizer), Some(text)) => {
                        match summarizer.summarize(text, topic_hint).await {
                            Ok(summary) => Some(summary),
                            Err(e) => {
                                warn!("Summarization failed for article {}: {}", index, e);
                                None
                            }
                        }
                    }
                    _ => None,
                }
            } else {
                None
            };

            article.summary =
                Some(remote_summary.unwrap_or_else(|| fallback_summary(article)));
        }

        articles
    }
}

/// Longest usable text for the summarizer: full body, then description, then
/// the bare title.
fn candidate_text(article: &Article) -> Option<&str> {
    [&article.content, &article.description, &article.title]
        .into_iter()
        .find(|field| is_present(field))
        .and_then(|field| field.as_deref())
}

fn fallback_summary(article: &Article) -> String {
    if is_present(&article.description) {
        article.description.clone().unwrap_or_default()
    } else {
        FALLBACK_SUMMARY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(content: Option<&str>, description: Option<&str>, title: Option<&str>) -> Article {
        Article {
            content: content.map(str::to_string),
            description: description.map(str::to_string),
            title: title.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn candidate_text_prefers_content() {
        let a = article(Some("body"), Some("desc"), Some("title"));
        assert_eq!(candidate_text(&a), Some("body"));
    }

    #[test]
    fn candidate_text_falls_back_to_description_then_title() {
        let a = article(None, Some("desc"), Some("title"));
        assert_eq!(candidate_text(&a), Some("desc"));

        let a = article(Some("  "), None, Some("title"));
        assert_eq!(candidate_text(&a), Some("title"));
    }

    #[test]
    fn fallback_uses_description_when_available() {
        let a = article(None, Some("desc"), Some("title"));
        assert_eq!(fallback_summary(&a), "desc");

        let a = article(None, None, Some("title"));
        assert_eq!(fallback_summary(&a), FALLBACK_SUMMARY);
    }
}
