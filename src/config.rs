use std::env;

/// Environment-derived settings. Both credentials are optional at load time;
/// what their absence means is decided where they are used.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Credential for the news provider. Without it no retrieval can run.
    pub news_api_key: Option<String>,
    /// Credential for the summarization provider. Without it summaries fall
    /// back to article descriptions.
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            news_api_key: read_key("NEWS_API_KEY"),
            gemini_api_key: read_key("GEMINI_API_KEY"),
        }
    }
}

fn read_key(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
