//! # Audio Collaborator
//!
//! The sampled-instrument player is external. The core only asks whether it
//! is ready and hands it note names with a duration; it never inspects or
//! tears down the player.
//!
//! Calls made before the player is ready are dropped with a warning and
//! reported as [`ChordError::AudioUnavailable`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

use crate::chord::{resolve_chord, ChordSpec, PitchResult, PlayMode};
use crate::error::ChordError;

/// A sampled-instrument player
pub trait AudioPlayer: Send + Sync {
    fn ready(&self) -> bool;

    /// Start `note_name` (e.g. `"C#4"`) at `start_time` seconds on the
    /// player's clock, for `duration` seconds.
    fn play(&self, note_name: &str, start_time: f64, duration: f64);

    /// The player's clock, in seconds.
    fn current_time(&self) -> f64 {
        0.0
    }
}

/// Play every name now, for `duration` seconds.
pub fn play_names(
    player: &dyn AudioPlayer,
    names: &[String],
    duration: f64,
) -> Result<(), ChordError> {
    if !player.ready() {
        warn!(?names, "audio player not ready, dropping notes");
        return Err(ChordError::AudioUnavailable);
    }
    let now = player.current_time();
    for name in names {
        player.play(name, now, duration);
    }
    Ok(())
}

/// Resolve a chord and play the hands selected by `mode`.
///
/// The resolved pitches are returned either way, so the keyboard can still
/// highlight them when audio is unavailable.
pub fn play_chord(
    player: &dyn AudioPlayer,
    spec: &ChordSpec,
    mode: PlayMode,
    duration: f64,
) -> (PitchResult, Result<(), ChordError>) {
    let result = resolve_chord(spec);
    let played = play_names(player, &result.names_for(mode), duration);
    (result, played)
}

/// A player that reports every note through `tracing`.
///
/// Stands in for the browser's sampled instrument on the command line. It
/// becomes ready on the first call to [`TracingPlayer::ensure_ready`] and
/// stays ready.
#[derive(Debug)]
pub struct TracingPlayer {
    instrument: String,
    ready: AtomicBool,
    started: Instant,
}

impl TracingPlayer {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            ready: AtomicBool::new(false),
            started: Instant::now(),
        }
    }

    pub fn ensure_ready(&self) {
        if !self.ready.swap(true, Ordering::SeqCst) {
            info!(instrument = %self.instrument, "instrument loaded");
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }
}

impl AudioPlayer for TracingPlayer {
    fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn play(&self, note_name: &str, start_time: f64, duration: f64) {
        info!(
            instrument = %self.instrument,
            note = note_name,
            start_time,
            duration,
            "play"
        );
    }

    fn current_time(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}
