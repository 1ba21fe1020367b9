//! Playback plan generation
//!
//! Converts one track of the timeline into timed steps. The scheduler walks
//! these steps in real time; a browser host can take the same plan and drive
//! its own timers.

use super::types::{PlaybackPlan, PlaybackStep};
use crate::timeline::{Timeline, Track};

/// Seconds per count (one count = one beat) at `bpm`.
///
/// A tempo of 0 is treated as 1 so durations stay finite.
pub fn seconds_per_count(bpm: u32) -> f64 {
    60.0 / bpm.max(1) as f64
}

/// Build the playback plan of one track.
///
/// Steps follow the track's position order. Each step starts where the
/// previous one ended and lasts `length * 60 / bpm` seconds. Rests are kept
/// as steps with no note names so highlighting keeps the same rhythm.
///
/// # Example
/// ```
/// use chordlab::playback::build_playback_plan;
/// use chordlab::{Accidental, ChordSymbol, Letter, Quality, Timeline, Track};
///
/// let mut timeline = Timeline::default();
/// let c = ChordSymbol::new(Letter::C, Accidental::Natural, Quality::Major, 4);
/// timeline.add_chord(Track::Chord, c, 2).unwrap();
/// timeline.add_rest(Track::Chord, 3).unwrap();
///
/// let plan = build_playback_plan(&timeline, Track::Chord, 120);
/// assert_eq!(plan.steps[0].note_names, vec!["C4", "E4", "G4"]);
/// assert_eq!(plan.steps[1].start_time, 1.0);
/// assert_eq!(plan.total_duration, 2.5);
/// ```
pub fn build_playback_plan(timeline: &Timeline, track: Track, bpm: u32) -> PlaybackPlan {
    let bpm = bpm.max(1);
    let seconds_per_count = seconds_per_count(bpm);

    let mut current_time = 0.0;
    let steps: Vec<PlaybackStep> = timeline
        .events_of(track)
        .into_iter()
        .map(|event| {
            let duration = event.length as f64 * seconds_per_count;
            let note_names = event
                .pitches()
                .map(|pitches| pitches.all_names)
                .unwrap_or_default();
            let step = PlaybackStep {
                event: event.clone(),
                is_rest: event.is_rest(),
                start_time: current_time,
                duration,
                note_names,
            };
            current_time += duration;
            step
        })
        .collect();

    PlaybackPlan {
        track,
        bpm,
        seconds_per_count,
        steps,
        total_duration: current_time,
    }
}
