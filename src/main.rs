use anyhow::Result;
use edscraper::{config::Config, fetch::HttpSource};
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) run the pipeline ─────────────────────────────────────────
    let config = Config::default();
    let source = HttpSource::new(Client::new());
    edscraper::run(&source, &config).await?;

    info!("all done");
    Ok(())
}
