use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Zone used to turn epoch milliseconds into calendar time. `Local` follows the
/// host's configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneChoice {
    #[default]
    Local,
    Utc,
}

impl TimeZoneChoice {
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Utc => "utc",
        }
    }

    /// Converts epoch milliseconds, keeping the zone's offset at that instant.
    pub fn at(self, timestamp_ms: i64) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Local => epoch_millis_to(timestamp_ms, &Local).map(|dt| dt.fixed_offset()),
            Self::Utc => epoch_millis_to(timestamp_ms, &Utc).map(|dt| dt.fixed_offset()),
        }
    }

    pub fn format(self, timestamp_ms: i64, time_format: &str) -> String {
        match self.at(timestamp_ms) {
            Some(time) => time.format(time_format).to_string(),
            None => timestamp_ms.to_string(),
        }
    }
}

/// Epoch milliseconds to a date/time in `tz`. Negative values are valid
/// pre-epoch instants; `None` only when chrono cannot represent the instant.
pub fn epoch_millis_to<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(tz))
}

/// Formatting with an unknown `%` directive panics inside `Display`, so patterns from
/// config are checked up front.
pub fn is_valid_time_format(pattern: &str) -> bool {
    !pattern.trim().is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}
