pub mod client;
pub mod config;
pub mod enricher;
pub mod filter;
pub mod pipeline;
pub mod server;
pub mod summarizer;
pub mod types;

pub use client::{NewsApiClient, NewsSource};
pub use config::Config;
pub use enricher::{SummaryEnricher, SUMMARY_LIMIT};
pub use pipeline::{FetchPolicy, NewsRetrievalPipeline};
pub use server::{create_app, AppState};
pub use summarizer::{GeminiClient, Summarizer};
pub use types::*;
