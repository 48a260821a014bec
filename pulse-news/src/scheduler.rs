//! Periodic refresh scheduler.
//!
//! Runs the ingestion pipeline on a fixed interval. The first tick fires
//! immediately so a freshly started service has articles right away.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::ingest::IngestPipeline;

/// Drives the ingestion pipeline on a fixed interval.
pub struct RefreshScheduler {
    pipeline: Arc<IngestPipeline>,
    period: Duration,
}

impl RefreshScheduler {
    pub fn new(pipeline: Arc<IngestPipeline>, refresh_minutes: u64) -> Self {
        // A zero interval would spin; floor at one minute.
        let minutes = refresh_minutes.max(1);
        Self {
            pipeline,
            period: Duration::from_secs(minutes * 60),
        }
    }

    /// Interval between refresh cycles.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run refresh cycles forever. Errors are logged; the loop never dies.
    pub async fn run(&self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.pipeline.refresh_all().await {
                Ok(stored) => {
                    tracing::info!(stored, "Refresh cycle completed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Refresh cycle failed");
                }
            }
        }
    }
}
