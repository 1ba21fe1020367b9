//! # Save / Load
//!
//! Compose-mode state as a flat JSON document:
//!
//! ```text
//! {
//!   "version": "1.0",
//!   "savedAt": "2025-03-01T12:34:56.789Z",
//!   "bpm": 120,
//!   "timeline": [ { "id": 1, "track": "chord", ... }, ... ]
//! }
//! ```
//!
//! Loading first checks that `timeline` is present and is a list, then
//! decodes the events. Any failure is [`ChordError::InvalidFormat`] and
//! nothing is applied.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChordError;
use crate::timeline::{Timeline, TimelineEvent};

pub const FORMAT_VERSION: &str = "1.0";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedComposition {
    #[serde(default = "default_version")]
    pub version: String,
    /// ISO-8601 timestamp of the save
    #[serde(default)]
    pub saved_at: String,
    /// Absent in hand-written files; the loader picks the configured tempo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
    pub timeline: Vec<TimelineEvent>,
}

impl SavedComposition {
    /// Snapshot a timeline and tempo, stamped with the current time.
    pub fn capture(timeline: &Timeline, bpm: u32) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            bpm: Some(bpm),
            timeline: timeline.events().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, ChordError> {
        serde_json::to_string_pretty(self).map_err(|e| ChordError::InvalidFormat(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ChordError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ChordError::InvalidFormat(e.to_string()))?;

        match value.get("timeline") {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(ChordError::InvalidFormat(
                    "timeline is not a list".to_string(),
                ))
            }
            None => return Err(ChordError::InvalidFormat("missing timeline".to_string())),
        }

        serde_json::from_value(value).map_err(|e| ChordError::InvalidFormat(e.to_string()))
    }

    /// The save timestamp, if it parses as RFC 3339.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.saved_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Load the events into `timeline`, leaving it untouched on failure.
    pub fn apply_to(self, timeline: &mut Timeline) -> Result<(), ChordError> {
        timeline.restore(self.timeline)
    }
}
