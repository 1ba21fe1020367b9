//! # Error Types
//!
//! This module defines all error types for the chordlab core.
//!
//! Every error is recoverable: the UI layer shows a message and carries on.
//! Chord resolution itself never fails, so none of these come out of
//! [`resolve_chord`](crate::resolve_chord).
//!
//! ## Error Types
//! - `CapacityExceeded` - A timeline add would overflow the track
//! - `NotFound` - Delete by an unknown id
//! - `TrackEmpty` - Undo on a track with nothing on it
//! - `InvalidFormat` - A saved composition could not be loaded
//! - `AudioUnavailable` - The sampled instrument is not ready yet
//! - `NoRootSelected` - Compose add with no note picked
//! - `InvalidLength` - A timeline event with zero length
//! - `ConfigError` - Invalid YAML configuration
//!
//! ## Usage
//! ```rust
//! use chordlab::{ChordError, Timeline, Track};
//!
//! let mut timeline = Timeline::new(4);
//! timeline.add_rest(Track::Chord, 4).unwrap();
//! match timeline.add_rest(Track::Chord, 1) {
//!     Err(ChordError::CapacityExceeded { available, .. }) => assert_eq!(available, 0),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror::Error;

use crate::timeline::Track;

#[derive(Error, Debug)]
pub enum ChordError {
    /// Adding the event would push the track past its maximum count.
    ///
    /// # Example
    /// ```
    /// # use chordlab::{ChordError, Track};
    /// let err = ChordError::CapacityExceeded {
    ///     track: Track::Bass,
    ///     requested: 4,
    ///     available: 2,
    /// };
    /// assert_eq!(err.to_string(), "Track bass is full: 4 counts requested, 2 available");
    /// ```
    #[error("Track {track} is full: {requested} counts requested, {available} available")]
    CapacityExceeded {
        track: Track,
        requested: u32,
        available: u32,
    },

    /// No event with this id exists on the timeline.
    #[error("No timeline event with id {0}")]
    NotFound(u32),

    /// Undo on a track that has no events.
    #[error("Track {0} has no events to delete")]
    TrackEmpty(Track),

    /// A saved composition is malformed.
    ///
    /// # Example
    /// ```
    /// # use chordlab::ChordError;
    /// let err = ChordError::InvalidFormat("missing timeline".to_string());
    /// assert_eq!(err.to_string(), "Invalid composition format: missing timeline");
    /// ```
    #[error("Invalid composition format: {0}")]
    InvalidFormat(String),

    #[error("Audio player is not ready")]
    AudioUnavailable,

    /// Compose mode has no root note selected yet.
    #[error("Select a root note first")]
    NoRootSelected,

    #[error("Event length must be positive, got {0}")]
    InvalidLength(u32),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
