//! VMS Motion Agent
//!
//! Polls a video-management-system HTTP API for camera motion events, pairs
//! raw motion start/end records into discrete motion episodes, and hands
//! each new episode to a download-and-process pipeline.
//!
//! ## Components
//!
//! 1. VmsClient - resilient basic-auth access to the VMS API
//! 2. enum_resolver - motion event-code discovery
//! 3. motion_pairer - start/end pairing state machine
//! 4. CursorState - already-dispatched episode suppression
//! 5. VideoPipeline - per-episode download/analyze/report
//! 6. PollingOrchestrator - fixed-cadence poll cycle

pub mod config;
pub mod cursor;
pub mod enum_resolver;
pub mod error;
pub mod motion_pairer;
pub mod pipeline;
pub mod polling_orchestrator;
pub mod time_codec;
pub mod vms_client;

pub use error::{Error, Result};
