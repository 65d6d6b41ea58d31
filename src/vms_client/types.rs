//! Serde wire types for the VMS HTTP surface.

use serde::{Deserialize, Serialize};

/// Event code the VMS uses for analytics events reported by integrations.
pub const ANALYTICS_EVENT_TYPE: i32 = 58;

/// Response of `GET /v2.0/cameras`.
///
/// The camera records carry a vendor-defined shape the agent only logs, so
/// they stay untyped.
#[derive(Debug, Clone, Deserialize)]
pub struct CamerasResponse {
    #[serde(default)]
    pub cameras: Vec<serde_json::Value>,
}

/// Response of `GET /v2.0/events/enums`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumsResponse {
    #[serde(default)]
    pub entities: Vec<EnumEntity>,
}

/// One entity enum description: the entity type code and the event codes it
/// supports.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumEntity {
    pub entity_type: i32,
    #[serde(default)]
    pub support_events: Vec<SupportedEvent>,
}

/// One supported event code within an entity enum description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedEvent {
    pub event_type: i32,
}

/// Raw event record from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Event type code (see the resolved motion codes).
    #[serde(rename = "type")]
    pub event_type: i32,
    /// Vendor tick timestamp of the event.
    pub time: i64,
    /// Not populated by every VMS build.
    #[serde(default)]
    pub camera_id: Option<String>,
}

/// Body of `POST /v2.0/events/search`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub log_events: LogEventsQuery,
}

/// The `logEvents` query block of a search request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEventsQuery {
    pub start_time_utc: String,
    pub end_time_utc: String,
    pub events: Vec<i32>,
    pub include_server_events: bool,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cameras: Option<Vec<String>>,
}

/// Response of `POST /v2.0/events/search`, most recent event last.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// One event entry for `POST /v2.0/events`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEvent {
    pub entity_type: i32,
    pub event_type: i32,
    pub event_description: String,
    pub user: String,
    pub device_guid: String,
}

/// Body of `POST /v2.0/events`.
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    pub events: Vec<OutboundEvent>,
}
