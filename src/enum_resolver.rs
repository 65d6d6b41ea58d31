//! Motion event-code discovery.
//!
//! The VMS describes, per entity type, which event codes it supports. The
//! motion start/end codes are fixed schema constants (10 and 11); what varies
//! per installation is whether any camera entity actually advertises them.
//! Resolution happens once at startup and the result is treated as constant
//! for the process lifetime.

use crate::error::{Error, Result};
use crate::vms_client::types::EnumEntity;

/// Entity type code for cameras in the VMS enum schema.
pub const CAMERA_ENTITY_TYPE: i32 = 1;

/// Event code for motion start on camera entities.
pub const MOTION_START_CODE: i32 = 10;

/// Event code for motion end on camera entities.
pub const MOTION_END_CODE: i32 = 11;

/// Resolved motion event codes for one VMS instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCodeMap {
    pub motion_start: i32,
    pub motion_end: i32,
}

/// Extract the motion start/end codes from an enum-discovery payload.
///
/// Presence accumulates across camera entities: one entity may advertise the
/// start code and another the end code. Scanning stops as soon as both have
/// been seen. Fails with [`Error::UnsupportedSchema`] when either code is
/// missing from every camera entity; callers must abort startup on that.
pub fn resolve(entities: &[EnumEntity]) -> Result<EventCodeMap> {
    let mut motion_start = None;
    let mut motion_end = None;

    for entity in entities {
        if entity.entity_type != CAMERA_ENTITY_TYPE {
            continue;
        }
        for event in &entity.support_events {
            if event.event_type == MOTION_START_CODE {
                motion_start = Some(MOTION_START_CODE);
            }
            if event.event_type == MOTION_END_CODE {
                motion_end = Some(MOTION_END_CODE);
            }
        }
        if motion_start.is_some() && motion_end.is_some() {
            break;
        }
    }

    match (motion_start, motion_end) {
        (Some(motion_start), Some(motion_end)) => Ok(EventCodeMap {
            motion_start,
            motion_end,
        }),
        _ => Err(Error::UnsupportedSchema(
            "no camera entity advertises both motion start and motion end".to_string(),
        )),
    }
}
