//! Per-episode downstream pipeline.
//!
//! ## Responsibilities
//!
//! - Download the recorded video for a completed motion episode
//! - Hand the file to the analysis backend
//! - Report detections back to the VMS
//!
//! The analysis step is an integration boundary: this agent has no video
//! analytics of its own.

use crate::enum_resolver::CAMERA_ENTITY_TYPE;
use crate::error::{Error, Result};
use crate::motion_pairer::MotionEpisode;
use crate::vms_client::types::{OutboundEvent, ANALYTICS_EVENT_TYPE};
use crate::vms_client::VmsClient;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Filename the episode video is written under, one at a time per episode.
const VIDEO_FILENAME: &str = "downloaded_video.avi";

/// One detection found in a processed episode video.
#[derive(Debug, Clone)]
pub struct Detection {
    /// GUID of the camera the detection belongs to.
    pub camera_uid: String,
    /// Analysis backend that produced the detection.
    pub source: String,
    /// Human-readable payload, e.g. the recognized plate.
    pub description: String,
    /// When the detection occurred.
    pub timestamp: DateTime<Utc>,
}

/// Downstream hand-off for completed motion episodes.
pub trait MotionPipeline {
    /// Run the full download -> analyze -> report chain for one episode.
    async fn handle(&self, episode: &MotionEpisode) -> Result<()>;
}

/// Production pipeline: VMS video download, analysis hand-off, event report.
pub struct VideoPipeline {
    client: Arc<VmsClient>,
    download_dir: PathBuf,
}

impl VideoPipeline {
    /// Create a pipeline writing downloads into `download_dir`.
    pub fn new(client: Arc<VmsClient>, download_dir: PathBuf) -> Self {
        Self {
            client,
            download_dir,
        }
    }

    /// Download the episode's recorded video.
    async fn download(&self, episode: &MotionEpisode) -> Result<PathBuf> {
        let dest = self.download_dir.join(VIDEO_FILENAME);
        self.client
            .download_video(&episode.camera, episode.start, episode.end, &dest)
            .await?;
        Ok(dest)
    }

    /// Analysis backend boundary. No backend is wired up in this agent;
    /// integrations supply their own [`MotionPipeline`] or implement this.
    async fn analyze(&self, _video: &Path) -> Result<Vec<Detection>> {
        Err(Error::Unimplemented("video analysis backend"))
    }

    /// Report detections back into the VMS event stream.
    async fn report(&self, detections: &[Detection]) -> Result<()> {
        if detections.is_empty() {
            return Ok(());
        }
        let events = detections.iter().map(outbound_event).collect();
        self.client.send_events(events).await
    }
}

impl MotionPipeline for VideoPipeline {
    async fn handle(&self, episode: &MotionEpisode) -> Result<()> {
        let video = self.download(episode).await?;
        let detections = self.analyze(&video).await?;
        self.report(&detections).await
    }
}

/// Build the VMS event entry for one detection.
fn outbound_event(detection: &Detection) -> OutboundEvent {
    OutboundEvent {
        entity_type: CAMERA_ENTITY_TYPE,
        event_type: ANALYTICS_EVENT_TYPE,
        event_description: format!("Plate Detection [{}]", detection.description),
        user: format!("Platerecognizer({})", detection.source),
        device_guid: detection.camera_uid.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_event_carries_the_analytics_shape() {
        let detection = Detection {
            camera_uid: "6a194dd0-23c1-4b1a-a039-1070bdecbba1".to_string(),
            source: "sdk".to_string(),
            description: "ABC123".to_string(),
            timestamp: Utc::now(),
        };

        let event = outbound_event(&detection);
        assert_eq!(event.entity_type, CAMERA_ENTITY_TYPE);
        assert_eq!(event.event_type, ANALYTICS_EVENT_TYPE);
        assert_eq!(event.event_description, "Plate Detection [ABC123]");
        assert_eq!(event.user, "Platerecognizer(sdk)");
        assert_eq!(event.device_guid, detection.camera_uid);
    }
}
