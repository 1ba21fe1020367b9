//! Playback plan type definitions

use serde::Serialize;

use crate::timeline::{TimelineEvent, Track};

/// One event of a track with its timing resolved
///
/// # Fields
/// - `event`: The timeline event, rests included
/// - `start_time`: Seconds from the start of the track
/// - `duration`: `event.length * seconds_per_count`
/// - `note_names`: Names to send to the player (empty for rests)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStep {
    pub event: TimelineEvent,
    pub is_rest: bool,
    pub start_time: f64,
    pub duration: f64,
    pub note_names: Vec<String>,
}

/// Timing table for one track at one tempo
///
/// # Fields
/// - `bpm`: Tempo used, clamped to at least 1
/// - `seconds_per_count`: `60 / bpm`
/// - `steps`: Events in position order
/// - `total_duration`: End of the last step, in seconds
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackPlan {
    pub track: Track,
    pub bpm: u32,
    pub seconds_per_count: f64,
    pub steps: Vec<PlaybackStep>,
    pub total_duration: f64,
}

impl PlaybackPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
