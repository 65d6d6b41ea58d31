//! PollingOrchestrator - fixed-cadence motion polling
//!
//! ## Responsibilities
//!
//! - Search the trailing event window each cycle
//! - Pair raw events into motion episodes
//! - Dispatch new episodes to the downstream pipeline
//!
//! One cycle runs to completion before the next tick, so a slow downstream
//! step delays polling rather than overlapping it. The window is recomputed
//! fresh each cycle; cycle gaps longer than the lookback lose events.

use crate::cursor::CursorState;
use crate::enum_resolver::EventCodeMap;
use crate::error::Result;
use crate::motion_pairer;
use crate::pipeline::MotionPipeline;
use crate::time_codec;
use crate::vms_client::VmsClient;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// PollingOrchestrator instance
pub struct PollingOrchestrator<P> {
    client: Arc<VmsClient>,
    pipeline: P,
    codes: EventCodeMap,
    camera_id: String,
    lookback: chrono::Duration,
    poll_interval: Duration,
    running: Arc<RwLock<bool>>,
}

impl<P: MotionPipeline> PollingOrchestrator<P> {
    /// Create a new orchestrator. `codes` comes from startup enum
    /// resolution and is constant for the process lifetime.
    pub fn new(
        client: Arc<VmsClient>,
        pipeline: P,
        codes: EventCodeMap,
        camera_id: String,
        lookback: chrono::Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            pipeline,
            codes,
            camera_id,
            lookback,
            poll_interval,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Run poll cycles until [`stop`](Self::stop) is called or the future is
    /// dropped. Cycle errors are logged and the loop continues; only startup
    /// enum resolution may abort the process, and that happens before the
    /// orchestrator is built.
    pub async fn run(&self, cursor: &mut CursorState) {
        *self.running.write().await = true;
        tracing::info!(
            camera_id = %self.camera_id,
            interval_secs = self.poll_interval.as_secs(),
            "Starting polling orchestrator"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            if !*self.running.read().await {
                break;
            }

            match self.run_cycle(cursor).await {
                Ok(dispatched) if dispatched > 0 => {
                    tracing::info!(dispatched, "Poll cycle complete");
                }
                Ok(_) => {
                    tracing::debug!("Poll cycle complete, nothing new");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Poll cycle failed");
                }
            }
        }

        tracing::info!("Polling orchestrator stopped");
    }

    /// Stop the loop after the current cycle.
    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    /// One poll cycle: search the trailing window, pair, dispatch whatever
    /// the cursor admits. Returns how many episodes were handed off.
    pub async fn run_cycle(&self, cursor: &mut CursorState) -> Result<usize> {
        let now = Utc::now();
        let window_start = now - self.lookback;

        let events = self
            .client
            .search_events(
                &time_codec::format_utc(window_start),
                &time_codec::format_utc(now),
                vec![self.codes.motion_start, self.codes.motion_end],
                Some(vec![self.camera_id.clone()]),
            )
            .await?;

        let episodes = motion_pairer::pair(&events, self.codes, &self.camera_id)?;
        tracing::debug!(
            events = events.len(),
            episodes = episodes.len(),
            "Paired motion events"
        );

        let mut dispatched = 0;
        for episode in episodes {
            if !cursor.admits(&episode) {
                tracing::debug!(
                    start = episode.start,
                    end = episode.end,
                    "Skipping stale episode"
                );
                continue;
            }

            match self.pipeline.handle(&episode).await {
                Ok(()) => {
                    tracing::info!(
                        camera_id = %episode.camera,
                        start = episode.start,
                        end = episode.end,
                        "Episode dispatched"
                    );
                    cursor.mark_dispatched(episode);
                    dispatched += 1;
                }
                Err(e) => {
                    // Cursor stays put so the episode is retried while it
                    // remains inside the search window.
                    tracing::error!(
                        error = %e,
                        start = episode.start,
                        end = episode.end,
                        "Pipeline failed for episode"
                    );
                }
            }
        }

        Ok(dispatched)
    }
}
