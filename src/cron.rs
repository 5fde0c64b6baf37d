use crate::errors::ThrottleError;
use crate::storage::Storage;
use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::{error, info, instrument};

pub struct CleanupService {
    storage: Arc<dyn Storage>,
}

impl CleanupService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Drop throttle counters whose window has already ended.
    /// Note: Redis expires counter keys automatically, so this mostly keeps
    /// the in-memory backend from accumulating stale identities.
    #[instrument(skip(self))]
    pub async fn run_cleanup(&self) -> Result<(), ThrottleError> {
        info!("Starting scheduled cleanup job...");

        let purged = self.storage.purge_expired().await?;

        info!(purged, "Cleanup job completed successfully.");
        Ok(())
    }

    /// Starts a background scheduler that runs the cleanup every `interval`.
    /// This consumes the service instance as it runs forever.
    pub async fn start_scheduler(self: Arc<Self>, interval: Duration) {
        let mut timer = time::interval(interval);

        info!("Cleanup scheduler started with interval: {:?}", interval);

        loop {
            // Wait for the next tick
            timer.tick().await;

            // Spawn the job as a separate task so the timer doesn't drift if the job is slow
            let service = self.clone();
            tokio::spawn(async move {
                if let Err(e) = service.run_cleanup().await {
                    error!("Cleanup job failed: {:?}", e);
                }
            });
        }
    }
}
