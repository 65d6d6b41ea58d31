//! Motion event pairing.
//!
//! Converts the time-ordered raw event stream (most recent last) into
//! completed motion episodes. At most one episode may be open at a time:
//! search windows are single-camera, so a second motion start while one is
//! open means the window is corrupt and the whole pass is rejected.

use crate::enum_resolver::EventCodeMap;
use crate::error::{Error, Result};
use crate::vms_client::types::RawEvent;

/// A paired motion interval attributed to one camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionEpisode {
    /// Vendor ticks of the motion-start event.
    pub start: i64,
    /// Vendor ticks of the motion-end event.
    pub end: i64,
    /// Camera GUID the episode belongs to.
    pub camera: String,
}

/// Pair raw events into completed motion episodes, in completion order.
///
/// A motion-end with nothing open is the tail of an episode that began
/// before the window and is ignored, as is every event code other than the
/// resolved start/end pair.
pub fn pair(events: &[RawEvent], codes: EventCodeMap, camera_id: &str) -> Result<Vec<MotionEpisode>> {
    let mut episodes = Vec::new();
    let mut open: Option<i64> = None;

    for event in events {
        if event.event_type == codes.motion_start {
            if open.is_some() {
                return Err(Error::DoubleStart { tick: event.time });
            }
            open = Some(event.time);
        } else if event.event_type == codes.motion_end {
            if let Some(start) = open.take() {
                // TODO stamp the camera from event.camera_id once the VMS
                // populates it; until then every episode gets the configured
                // camera
                episodes.push(MotionEpisode {
                    start,
                    end: event.time,
                    camera: camera_id.to_string(),
                });
            }
        }
    }

    Ok(episodes)
}
