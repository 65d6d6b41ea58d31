//! Dispatched-episode tracking.
//!
//! Suppresses episodes the downstream pipeline has already handled. This is
//! stale-window suppression, not identity dedup: the search window trails
//! "now" by a fixed lookback, so an episode that ended before the last
//! dispatched episode started must have been seen by an earlier cycle.

use crate::motion_pairer::MotionEpisode;

/// Tracks the most recently dispatched episode across poll cycles.
///
/// In-memory only; a restart re-dispatches whatever the first window yields.
#[derive(Debug, Default)]
pub struct CursorState {
    last_dispatched: Option<MotionEpisode>,
}

impl CursorState {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this episode still needs dispatching.
    pub fn admits(&self, episode: &MotionEpisode) -> bool {
        match &self.last_dispatched {
            Some(last) => episode.end >= last.start,
            None => true,
        }
    }

    /// Record a successful hand-off. Call only after the pipeline accepted
    /// the episode.
    pub fn mark_dispatched(&mut self, episode: MotionEpisode) {
        self.last_dispatched = Some(episode);
    }

    /// The last episode handed to the pipeline, if any.
    pub fn last_dispatched(&self) -> Option<&MotionEpisode> {
        self.last_dispatched.as_ref()
    }
}
