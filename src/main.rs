use clap::Parser;
use palm_news::{create_app, AppState, Config};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "palm-news", about = "News retrieval and summarization proxy")]
struct Args {
    /// Address the proxy listens on.
    #[arg(long, default_value = "0.0.0.0:3000", env = "BIND_ADDR")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::from_env();

    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY is not set; /news will answer with a configuration error");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; summaries will fall back to descriptions");
    }

    let app = create_app(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("Listening on {}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
