//! # Public API
//!
//! String-in, data-out entry points for hosts that speak JSON (the browser
//! bindings and the `--json` CLI output).
//!
//! - [`resolve_chord_json()`] - Resolve a JSON `ChordSpec`
//! - [`wheel()`] - Circle of fifths with each key's major scale
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordlab::resolve_chord_json;
//!
//! let result = resolve_chord_json(r#"{"root":"D","quality":"minor","octave":4}"#)?;
//! assert_eq!(result.all_names, vec!["D4", "F4", "A4"]);
//! # Ok::<(), chordlab::ChordError>(())
//! ```

use serde::Serialize;

use crate::chord::{resolve_chord, ChordSpec, PitchResult};
use crate::error::ChordError;
use crate::theory::{circle_of_fifths, major_scale, PitchClass};

/// Resolve a chord given as JSON.
///
/// Missing fields take their defaults and unknown enum keys fall back as
/// usual, so only malformed JSON is an error.
pub fn resolve_chord_json(spec_json: &str) -> Result<PitchResult, ChordError> {
    let spec: ChordSpec =
        serde_json::from_str(spec_json).map_err(|e| ChordError::InvalidFormat(e.to_string()))?;
    Ok(resolve_chord(&spec))
}

/// One key on the circle of fifths
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelEntry {
    pub pitch_class: u8,
    pub name: &'static str,
    /// Clockwise index, C = 0
    pub position: usize,
    pub scale: Vec<&'static str>,
}

/// The twelve keys in circle-of-fifths order, spelled with flats when
/// `prefer_flat` is set.
pub fn wheel(prefer_flat: bool) -> Vec<WheelEntry> {
    circle_of_fifths()
        .iter()
        .enumerate()
        .map(|(position, &pc)| WheelEntry {
            pitch_class: pc.value(),
            name: pc.spelled(prefer_flat),
            position,
            scale: scale_names(pc, prefer_flat),
        })
        .collect()
}

fn scale_names(tonic: PitchClass, prefer_flat: bool) -> Vec<&'static str> {
    major_scale(tonic)
        .into_iter()
        .map(|pc| pc.spelled(prefer_flat))
        .collect()
}
