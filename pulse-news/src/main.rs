//! Pulse News - personalized news aggregation service.
//!
//! Periodically ingests headlines from NewsAPI.org, tags each article with
//! a lexicon-based sentiment classification, and keeps the in-memory feed
//! store fresh.

use anyhow::Result;
use pulse_common::config::Config;
use pulse_common::logging::init_logging;
use pulse_news::NewsService;

#[tokio::main]
async fn main() -> Result<()> {
    // Start timing immediately for cold-start measurement
    let startup_start = std::time::Instant::now();

    // Load configuration
    let config = Config::load_with_env()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Pulse News v{}", env!("CARGO_PKG_VERSION"));

    let service = NewsService::new(config)?;

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    service.start().await
}
