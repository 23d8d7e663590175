use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

use nlpdesk::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG from the file applies to the filter
    let _ = dotenvy::dotenv();

    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(target: "nlpdesk", "nlpdesk starting: RUST_LOG='{}', config={:?}", rust_log, config);

    nlpdesk::server::run(config).await
}
