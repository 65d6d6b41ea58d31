//! Vendor timestamp conversions.
//!
//! The VMS encodes event times as 100-nanosecond ticks since
//! 1601-01-01T00:00:00Z and takes wall-clock request parameters as
//! `YYYY-MM-DDTHH:MM:SSZ` strings.

use chrono::{DateTime, Utc};

/// Tick count of the Unix epoch in the VMS time base.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;

/// Ticks per second (100 ns resolution).
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Wire format for time parameters, second precision, always UTC.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Convert a VMS tick timestamp to a UTC instant.
///
/// Sub-second ticks are truncated toward zero. Callers guarantee the tick
/// count came from the VMS, so the range check cannot fire in practice.
pub fn ticks_to_utc(ticks: i64) -> DateTime<Utc> {
    let unix_secs = (ticks - UNIX_EPOCH_TICKS) / TICKS_PER_SECOND;
    DateTime::from_timestamp(unix_secs, 0).expect("tick timestamp outside representable range")
}

/// Render an instant in the VMS wire time format.
pub fn format_utc(t: DateTime<Utc>) -> String {
    t.format(WIRE_TIME_FORMAT).to_string()
}
