//! Export timestamp
//!
//! Exported files carry `YYYY-MM-DDTHH:MM:SSZ`: the ISO-8601 rendering of
//! the export instant cut at the seconds, with any fraction or offset
//! dropped and a literal `Z` appended.

use chrono::{DateTime, SecondsFormat, Utc};

/// Truncates an ISO-8601 timestamp to whole seconds and appends `Z`.
///
/// Everything after `YYYY-MM-DDTHH:MM:SS` (fraction, `Z`, `+hh:mm`) is
/// dropped. The offset is not applied; the result always claims UTC.
///
/// # Examples
/// ```
/// use cataid_common::truncate_iso_timestamp;
///
/// assert_eq!(truncate_iso_timestamp("2025-03-04T05:06:07.891Z"), "2025-03-04T05:06:07Z");
/// assert_eq!(truncate_iso_timestamp("2025-03-04T05:06:07+09:00"), "2025-03-04T05:06:07Z");
/// ```
pub fn truncate_iso_timestamp(iso: &str) -> String {
    let end = iso
        .char_indices()
        .skip_while(|(_, c)| *c != 'T')
        .find(|(_, c)| matches!(c, '.' | 'Z' | '+' | '-'))
        .map(|(i, _)| i)
        .unwrap_or(iso.len());
    format!("{}Z", &iso[..end])
}

/// Export timestamp of an instant
pub fn export_timestamp(now: DateTime<Utc>) -> String {
    truncate_iso_timestamp(&now.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Export timestamp of the current wall-clock time
pub fn export_timestamp_now() -> String {
    export_timestamp(Utc::now())
}
