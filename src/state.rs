//! # Application State
//!
//! The two screens each own one explicit state value that the UI layer
//! passes around:
//! - [`LearnState`] - the chord being studied and how it is voiced and played
//! - [`ComposeState`] - the current selection, the timeline and the tempo
//!
//! Both start from an [`AppConfig`] so that capacity, tempo and octave
//! limits come from one place.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chord::{
    resolve_chord, ChordSpec, PitchResult, PlayMode, Quality, RightHand, RightHandPattern,
    RightVoicing, Voicing,
};
use crate::config::AppConfig;
use crate::error::ChordError;
use crate::persist::SavedComposition;
use crate::playback::{build_playback_plan, PlaybackPlan};
use crate::theory::{Accidental, Letter};
use crate::timeline::{ChordSymbol, Timeline, TimelineEvent, Track};

/// Learn-mode selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearnState {
    pub root_note: Letter,
    pub accidental: Accidental,
    pub chord_type: Quality,
    pub left_octave: i32,
    /// Right-hand octave, relative to the left hand
    pub right_octave_shift: i32,
    pub voicing: Voicing,
    pub right_hand_pattern: RightHandPattern,
    pub right_voicing: RightVoicing,
    pub instrument: String,
    pub play_mode: PlayMode,
}

impl Default for LearnState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl LearnState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            root_note: Letter::C,
            accidental: Accidental::Natural,
            chord_type: Quality::Single,
            left_octave: config.default_octave,
            right_octave_shift: 1,
            voicing: Voicing::Root,
            right_hand_pattern: RightHandPattern::Root,
            right_voicing: RightVoicing::Close,
            instrument: config.instrument.clone(),
            play_mode: PlayMode::Both,
        }
    }

    /// The two-hand chord this selection describes.
    pub fn chord_spec(&self) -> ChordSpec {
        ChordSpec::new(self.root_note, self.accidental, self.chord_type, self.left_octave)
            .with_voicing(self.voicing)
            .with_right_hand(RightHand {
                pattern: self.right_hand_pattern,
                octave_shift: self.right_octave_shift,
                voicing: self.right_voicing,
            })
    }

    pub fn resolve(&self) -> PitchResult {
        resolve_chord(&self.chord_spec())
    }

    /// Names to send to the player under the current play mode.
    pub fn names_to_play(&self) -> Vec<String> {
        self.resolve().names_for(self.play_mode)
    }

    /// Update one field from a UI key and value.
    ///
    /// Keys are the camelCase field names. Returns `false`, with a warning,
    /// for an unknown key or a value that does not parse; the state is
    /// unchanged in that case. Enum values follow the usual unknown-key
    /// fallbacks.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let applied = match key {
            "rootNote" => match Letter::parse(value) {
                Some(letter) => {
                    self.root_note = letter;
                    true
                }
                None => false,
            },
            "accidental" => {
                self.accidental = Accidental::from_key(value);
                true
            }
            "chordType" => {
                self.chord_type = Quality::from_key(value);
                true
            }
            "leftOctave" => parse_into(value, &mut self.left_octave),
            "rightOctaveShift" => parse_into(value, &mut self.right_octave_shift),
            "voicing" => {
                self.voicing = Voicing::from_key(value);
                true
            }
            "rightHandPattern" => {
                self.right_hand_pattern = RightHandPattern::from_key(value);
                true
            }
            "rightVoicing" => {
                self.right_voicing = RightVoicing::from_key(value);
                true
            }
            "instrument" => {
                self.instrument = value.to_string();
                true
            }
            "playMode" => {
                self.play_mode = PlayMode::from_key(value);
                true
            }
            _ => {
                warn!(key, "invalid state key");
                return false;
            }
        };

        if applied {
            debug!(key, value, "state updated");
        } else {
            warn!(key, value, "invalid state value");
        }
        applied
    }
}

fn parse_into(value: &str, field: &mut i32) -> bool {
    match value.trim().parse() {
        Ok(parsed) => {
            *field = parsed;
            true
        }
        Err(_) => false,
    }
}

/// Compose-mode selection, timeline and tempo
#[derive(Debug, Clone)]
pub struct ComposeState {
    /// `None` until the user picks a note
    pub current_root: Option<Letter>,
    pub current_accidental: Accidental,
    pub current_quality: Quality,
    current_length: u32,
    current_octave: i32,
    pub active_track: Track,
    pub timeline: Timeline,
    bpm: u32,
    config: AppConfig,
}

impl Default for ComposeState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl ComposeState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            current_root: None,
            current_accidental: Accidental::Natural,
            current_quality: Quality::Major,
            current_length: config.default_length.max(1),
            current_octave: config.default_octave,
            active_track: Track::Chord,
            timeline: Timeline::new(config.max_count_per_track),
            bpm: config.default_bpm.max(1),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Tempos below 1 are raised to 1.
    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = bpm.max(1);
        debug!(bpm = self.bpm, "tempo set");
    }

    pub fn current_length(&self) -> u32 {
        self.current_length
    }

    pub fn set_length(&mut self, length: u32) -> Result<(), ChordError> {
        if length == 0 {
            return Err(ChordError::InvalidLength(length));
        }
        self.current_length = length;
        Ok(())
    }

    pub fn current_octave(&self) -> i32 {
        self.current_octave
    }

    /// Clamped to the configured octave range.
    pub fn set_octave(&mut self, octave: i32) {
        self.current_octave = self.config.clamp_octave(octave);
    }

    /// The symbol the current selection would add, if a root is picked.
    pub fn current_symbol(&self) -> Option<ChordSymbol> {
        self.current_root.map(|root| {
            ChordSymbol::new(
                root,
                self.current_accidental,
                self.current_quality,
                self.current_octave,
            )
        })
    }

    /// Preview name of the selection on the active track.
    pub fn current_name(&self) -> Option<String> {
        self.current_symbol()
            .map(|symbol| symbol.display_name(self.active_track))
    }

    /// Add the current selection to the end of the active track.
    pub fn add_current(&mut self) -> Result<u32, ChordError> {
        let symbol = self.current_symbol().ok_or(ChordError::NoRootSelected)?;
        self.timeline
            .add_chord(self.active_track, symbol, self.current_length)
    }

    /// Add a rest of the current length to the active track.
    pub fn add_rest(&mut self) -> Result<u32, ChordError> {
        self.timeline.add_rest(self.active_track, self.current_length)
    }

    /// Undo the last add on the active track.
    pub fn undo(&mut self) -> Result<TimelineEvent, ChordError> {
        self.timeline.delete_last(self.active_track)
    }

    pub fn playback_plan(&self) -> PlaybackPlan {
        build_playback_plan(&self.timeline, self.active_track, self.bpm)
    }

    pub fn save_json(&self) -> Result<String, ChordError> {
        SavedComposition::capture(&self.timeline, self.bpm).to_json()
    }

    /// Replace the timeline and tempo from a saved document.
    ///
    /// Nothing changes unless the whole document loads.
    pub fn load_json(&mut self, json: &str) -> Result<(), ChordError> {
        let saved = SavedComposition::from_json(json)?;
        let bpm = saved.bpm.unwrap_or(self.config.default_bpm).max(1);
        saved.apply_to(&mut self.timeline)?;
        self.bpm = bpm;
        debug!(events = self.timeline.events().len(), bpm, "composition loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learn_defaults_resolve() {
        let state = LearnState::default();
        let result = state.resolve();
        assert_eq!(result.left_hand_names, vec!["C4"]);
        assert_eq!(result.right_hand_names, vec!["C5"]);
        assert_eq!(state.instrument, "acoustic_grand_piano");
    }

    #[test]
    fn test_learn_set_keys() {
        let mut state = LearnState::default();
        assert!(state.set("rootNote", "a"));
        assert!(state.set("chordType", "minor"));
        assert!(state.set("leftOctave", "3"));
        assert!(state.set("rightHandPattern", "none"));
        assert!(state.set("playMode", "left-only"));

        assert_eq!(state.names_to_play(), vec!["A3", "C4", "E4"]);
    }

    #[test]
    fn test_learn_set_rejects_bad_input() {
        let mut state = LearnState::default();
        let before = state.clone();
        assert!(!state.set("tempo", "90"));
        assert!(!state.set("leftOctave", "high"));
        assert!(!state.set("rootNote", "H"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_learn_state_json_keys() {
        let json = serde_json::to_value(LearnState::default()).unwrap();
        assert_eq!(json["rootNote"], "C");
        assert_eq!(json["chordType"], "none");
        assert_eq!(json["rightHandPattern"], "root");
        assert_eq!(json["playMode"], "both");
    }

    #[test]
    fn test_compose_requires_root() {
        let mut state = ComposeState::default();
        assert!(matches!(state.add_current(), Err(ChordError::NoRootSelected)));
        assert_eq!(state.current_name(), None);

        state.current_root = Some(Letter::B);
        state.current_accidental = Accidental::Flat;
        state.current_quality = Quality::Minor7;
        assert_eq!(state.current_name().as_deref(), Some("B♭m7"));
        assert!(state.add_current().is_ok());
    }

    #[test]
    fn test_compose_uses_selection() {
        let mut state = ComposeState::default();
        state.current_root = Some(Letter::G);
        state.active_track = Track::Bass;
        state.set_length(4).unwrap();
        state.set_octave(9);

        let id = state.add_current().unwrap();
        let event = state.timeline.get(id).unwrap();
        assert_eq!(event.length, 4);
        assert_eq!(event.chord().unwrap().octave, 6);
        assert_eq!(event.display_name(), "G6");

        state.add_rest().unwrap();
        assert_eq!(state.timeline.track_total(Track::Bass), 8);
        assert!(state.undo().unwrap().is_rest());
    }

    #[test]
    fn test_compose_capacity_from_config() {
        let config = AppConfig {
            max_count_per_track: 2,
            ..AppConfig::default()
        };
        let mut state = ComposeState::new(config);
        state.add_rest().unwrap();
        state.add_rest().unwrap();
        assert!(matches!(
            state.add_rest(),
            Err(ChordError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_zero_length_and_tempo() {
        let mut state = ComposeState::default();
        assert!(state.set_length(0).is_err());
        assert_eq!(state.current_length(), 1);
        state.set_bpm(0);
        assert_eq!(state.bpm(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let mut state = ComposeState::default();
        state.current_root = Some(Letter::D);
        state.add_current().unwrap();
        state.set_bpm(88);
        let json = state.save_json().unwrap();

        let mut other = ComposeState::default();
        other.load_json(&json).unwrap();
        assert_eq!(other.bpm(), 88);
        assert_eq!(other.timeline.events(), state.timeline.events());
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut state = ComposeState::default();
        state.add_rest().unwrap();
        state.set_bpm(70);

        for bad in ["{}", r#"{"timeline": 3}"#, r#"{"bpm": 90, "timeline": "x"}"#] {
            assert!(matches!(state.load_json(bad), Err(ChordError::InvalidFormat(_))));
        }
        assert_eq!(state.bpm(), 70);
        assert_eq!(state.timeline.events().len(), 1);
    }

    #[test]
    fn test_load_without_bpm_uses_config_default() {
        let config = AppConfig {
            default_bpm: 100,
            ..AppConfig::default()
        };
        let mut state = ComposeState::new(config);
        state.set_bpm(60);
        state.load_json(r#"{"timeline": []}"#).unwrap();
        assert_eq!(state.bpm(), 100);
    }
}
