//! # Chord Module
//!
//! Resolve symbolic chords into the pitches each hand plays.
//!
//! ## Purpose
//! The UI collects a root letter, accidental, chord quality, octave and
//! voicing (and, in two-hand mode, a right-hand pattern). This module turns
//! that selection into:
//! 1. **MIDI numbers** per hand, for the keyboard highlight
//! 2. **Note names** (`C4`, `F#3`, ...) for the sampled-instrument player
//! 3. **A de-duplicated union** of both hands, for "play everything"
//!
//! ## Sub-modules
//! - `types` - ChordSpec, Quality, Voicing, RightHand, PitchResult
//! - `resolver` - The resolution algorithm and voicing transforms
//!
//! ## Entry Point
//! [`resolve_chord()`] - Convert a ChordSpec to a PitchResult
//!
//! ## Example
//! ```rust
//! use chordlab::chord::{resolve_chord, ChordSpec, Quality, RightHand};
//! use chordlab::theory::{Accidental, Letter};
//!
//! let spec = ChordSpec::new(Letter::G, Accidental::Natural, Quality::Dominant7, 3)
//!     .with_right_hand(RightHand::default());
//! let result = resolve_chord(&spec);
//!
//! assert_eq!(result.left_hand_names, vec!["G3", "B3", "D4", "F4"]);
//! assert_eq!(result.right_hand_names, vec!["G4"]);
//! ```
//!
//! ## Voicing vs Pitch Content
//! Voicings only move notes between octaves. For every root, accidental,
//! quality and voicing, the set of pitch classes equals
//! `{ (root + i) mod 12 : i in quality.intervals() }`.
//!
//! ## Single-Hand Mode
//! When a spec has no right hand, a `none`-quality chord (a single note) is
//! doubled in the right hand and any real chord leaves the right hand empty.
//! `all_names` removes the duplicate, so a single note still sounds once.

mod resolver;
mod types;

pub use resolver::{apply_voicing, resolve_chord};
pub use types::{
    ChordSpec, PitchResult, PlayMode, Quality, RightHand, RightHandPattern, RightVoicing, Voicing,
};
