use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rate recorded when no run has written one yet.
pub const DEFAULT_RATE: f64 = 0.9;

/// Persisted progress of one source directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Files modified at or before this instant count as processed
    #[serde(with = "rfc3339_offset")]
    pub last_processed_at: DateTime<Utc>,
    /// Rate of the run that last wrote the record
    #[serde(default = "default_rate")]
    pub last_rate: f64,
}

fn default_rate() -> f64 {
    DEFAULT_RATE
}

impl ProgressRecord {
    pub fn new(last_processed_at: DateTime<Utc>, last_rate: f64) -> Self {
        Self { last_processed_at, last_rate }
    }

    /// Record synthesized when none exists on disk.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self::new(now, DEFAULT_RATE)
    }
}

/// RFC 3339 with an explicit `+00:00` offset and full sub-second precision.
///
/// Precision matters: a truncated baseline would sort before the file that
/// produced it and the file would be picked up again.
mod rfc3339_offset {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
