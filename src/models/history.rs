//! Admin registration history (audit) rows.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// US-locale timestamp format written by older clients, e.g. `1/5/2025, 3:04:05 PM`.
const LEGACY_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Format used when showing registration times.
pub const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Row of the `admin_history` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminHistoryEntry {
    #[serde(default)]
    pub history_id: Option<i64>,
    pub admin_uuid: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub registered_at: String,
}

impl AdminHistoryEntry {
    /// Registration time in the registry timezone, if the stored value parses.
    pub fn registered_at_in(&self, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        parse_registered_at(&self.registered_at, offset)
    }

    /// One-line description for the history panel.
    pub fn describe(&self, offset: &FixedOffset) -> String {
        let when = self
            .registered_at_in(offset)
            .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| self.registered_at.clone());
        format!("You registered {} as {} on {}", self.first_name, self.role, when)
    }
}

/// Parse a stored registration time.
///
/// Accepts RFC 3339 (what this client writes and what the backend returns for
/// timestamp columns) and the legacy locale format, which carries no offset and
/// is read as registry-local time.
pub fn parse_registered_at(value: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(offset));
    }
    // The REST service renders timestamptz with a space separator.
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(offset));
    }
    NaiveDateTime::parse_from_str(value, LEGACY_FORMAT)
        .ok()
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

/// DTO for inserting a history row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewHistoryEntry {
    pub admin_uuid: String,
    pub first_name: String,
    pub role: Role,
    /// RFC 3339 timestamp in the registry timezone.
    pub registered_at: String,
}

impl NewHistoryEntry {
    pub fn new(admin_uuid: &str, first_name: &str, role: Role, registered_at: DateTime<FixedOffset>) -> Self {
        Self {
            admin_uuid: admin_uuid.to_string(),
            first_name: first_name.to_string(),
            role,
            registered_at: registered_at.to_rfc3339(),
        }
    }
}
