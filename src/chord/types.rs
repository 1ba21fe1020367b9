//! Chord specification and resolution result types
//!
//! Every enum here is parsed from the string keys the UI sends. Unknown keys
//! never fail; they fall back to a safe default so any UI state still
//! resolves to something playable.

use serde::{Deserialize, Serialize};

use crate::theory::{midi_to_name, root_pitch_class, Accidental, Letter, PitchClass};

/// Chord quality (chord type)
///
/// # Interval Table
/// | Key     | Intervals       |
/// |---------|-----------------|
/// | `none`  | 0               |
/// | `major` | 0, 4, 7         |
/// | `minor` | 0, 3, 7         |
/// | `7`     | 0, 4, 7, 10     |
/// | `maj7`  | 0, 4, 7, 11     |
/// | `m7`    | 0, 3, 7, 10     |
/// | `sus4`  | 0, 5, 7         |
/// | `dim`   | 0, 3, 6         |
/// | `aug`   | 0, 4, 8         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Quality {
    /// A single note, no chord
    #[default]
    #[serde(rename = "none")]
    Single,
    #[serde(rename = "major")]
    Major,
    #[serde(rename = "minor")]
    Minor,
    #[serde(rename = "7")]
    Dominant7,
    #[serde(rename = "maj7")]
    Major7,
    #[serde(rename = "m7")]
    Minor7,
    #[serde(rename = "sus4")]
    Sus4,
    #[serde(rename = "dim")]
    Diminished,
    #[serde(rename = "aug")]
    Augmented,
}

impl Quality {
    pub const ALL: [Quality; 9] = [
        Quality::Single,
        Quality::Major,
        Quality::Minor,
        Quality::Dominant7,
        Quality::Major7,
        Quality::Minor7,
        Quality::Sus4,
        Quality::Diminished,
        Quality::Augmented,
    ];

    /// Parse a UI key. Unknown keys (including `rest`) become `Single`.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "major" | "maj" | "M" => Quality::Major,
            "minor" | "min" | "m" => Quality::Minor,
            "7" | "dominant7" | "dom7" => Quality::Dominant7,
            "maj7" | "major7" | "M7" => Quality::Major7,
            "m7" | "minor7" | "min7" => Quality::Minor7,
            "sus4" => Quality::Sus4,
            "dim" => Quality::Diminished,
            "aug" => Quality::Augmented,
            // "none", "single", "rest"
            _ => Quality::Single,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Quality::Single => "none",
            Quality::Major => "major",
            Quality::Minor => "minor",
            Quality::Dominant7 => "7",
            Quality::Major7 => "maj7",
            Quality::Minor7 => "m7",
            Quality::Sus4 => "sus4",
            Quality::Diminished => "dim",
            Quality::Augmented => "aug",
        }
    }

    /// Semitone offsets from the root, lowest first.
    pub fn intervals(self) -> &'static [i32] {
        match self {
            Quality::Single => &[0],
            Quality::Major => &[0, 4, 7],
            Quality::Minor => &[0, 3, 7],
            Quality::Dominant7 => &[0, 4, 7, 10],
            Quality::Major7 => &[0, 4, 7, 11],
            Quality::Minor7 => &[0, 3, 7, 10],
            Quality::Sus4 => &[0, 5, 7],
            Quality::Diminished => &[0, 3, 6],
            Quality::Augmented => &[0, 4, 8],
        }
    }

    /// Suffix after the root in a chord symbol (`C`, `Cm`, `C7`, ...)
    pub fn suffix(self) -> &'static str {
        match self {
            Quality::Single | Quality::Major => "",
            Quality::Minor => "m",
            Quality::Dominant7 => "7",
            Quality::Major7 => "maj7",
            Quality::Minor7 => "m7",
            Quality::Sus4 => "sus4",
            Quality::Diminished => "dim",
            Quality::Augmented => "aug",
        }
    }

    /// Label shown next to the chord selector
    pub fn label(self) -> &'static str {
        match self {
            Quality::Single => "",
            Quality::Major => "Major",
            Quality::Minor => "Minor",
            Quality::Dominant7 => "7",
            Quality::Major7 => "Maj7",
            Quality::Minor7 => "m7",
            Quality::Sus4 => "sus4",
            Quality::Diminished => "dim",
            Quality::Augmented => "aug",
        }
    }
}

impl From<String> for Quality {
    fn from(key: String) -> Self {
        Quality::from_key(&key)
    }
}

/// Left-hand (chord hand) voicing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Voicing {
    #[default]
    #[serde(rename = "root")]
    Root,
    /// Lowest note raised an octave
    #[serde(rename = "first")]
    FirstInversion,
    /// Two lowest notes raised an octave
    #[serde(rename = "second")]
    SecondInversion,
    /// Root doubled an octave up
    #[serde(rename = "spread")]
    Spread,
}

impl Voicing {
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "first" | "first-inversion" => Voicing::FirstInversion,
            "second" | "second-inversion" => Voicing::SecondInversion,
            "spread" => Voicing::Spread,
            _ => Voicing::Root,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Voicing::Root => "root",
            Voicing::FirstInversion => "first",
            Voicing::SecondInversion => "second",
            Voicing::Spread => "spread",
        }
    }
}

impl From<String> for Voicing {
    fn from(key: String) -> Self {
        Voicing::from_key(&key)
    }
}

/// What the right hand plays on top of the chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RightHandPattern {
    #[serde(rename = "none")]
    Empty,
    #[default]
    #[serde(rename = "root")]
    Root,
    #[serde(rename = "chord-tones")]
    ChordTones,
    /// Chord tones one octave above the right hand's octave
    #[serde(rename = "arpeggio")]
    Arpeggio,
    /// Root at two adjacent octaves
    #[serde(rename = "octave-double")]
    OctaveDouble,
    /// The third interval of the chord, or its last if shorter
    #[serde(rename = "fifth")]
    Fifth,
}

impl RightHandPattern {
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "none" => RightHandPattern::Empty,
            "chord-tones" | "full-chord-tones" => RightHandPattern::ChordTones,
            "arpeggio" => RightHandPattern::Arpeggio,
            "octave-double" | "octave-doubled-root" => RightHandPattern::OctaveDouble,
            "fifth" => RightHandPattern::Fifth,
            _ => RightHandPattern::Root,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            RightHandPattern::Empty => "none",
            RightHandPattern::Root => "root",
            RightHandPattern::ChordTones => "chord-tones",
            RightHandPattern::Arpeggio => "arpeggio",
            RightHandPattern::OctaveDouble => "octave-double",
            RightHandPattern::Fifth => "fifth",
        }
    }

    /// Right-hand MIDI notes for a chord rooted at `base_midi`.
    pub fn generate(self, base_midi: i32, intervals: &[i32], octave_shift: i32) -> Vec<i32> {
        let shifted = base_midi + 12 * octave_shift;
        match self {
            RightHandPattern::Empty => Vec::new(),
            RightHandPattern::Root => vec![shifted],
            RightHandPattern::ChordTones => intervals.iter().map(|i| shifted + i).collect(),
            RightHandPattern::Arpeggio => intervals.iter().map(|i| shifted + 12 + i).collect(),
            RightHandPattern::OctaveDouble => vec![shifted, shifted + 12],
            RightHandPattern::Fifth => {
                let fifth = if intervals.len() >= 3 {
                    intervals.get(2)
                } else {
                    intervals.last()
                };
                fifth.map(|i| vec![shifted + i]).unwrap_or_default()
            }
        }
    }
}

impl From<String> for RightHandPattern {
    fn from(key: String) -> Self {
        RightHandPattern::from_key(&key)
    }
}

/// Right-hand voicing: close, or opened by two semitones per note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RightVoicing {
    #[default]
    Close,
    Open,
}

impl RightVoicing {
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "open" => RightVoicing::Open,
            _ => RightVoicing::Close,
        }
    }
}

impl From<String> for RightVoicing {
    fn from(key: String) -> Self {
        RightVoicing::from_key(&key)
    }
}

/// The right-hand layer of a two-hand chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RightHand {
    pub pattern: RightHandPattern,
    /// Octaves above the chord hand
    pub octave_shift: i32,
    pub voicing: RightVoicing,
}

impl Default for RightHand {
    fn default() -> Self {
        Self {
            pattern: RightHandPattern::Root,
            octave_shift: 1,
            voicing: RightVoicing::Close,
        }
    }
}

/// A symbolic chord to resolve into pitches
///
/// `right_hand == None` is the single-hand mode: a `none`-quality chord
/// doubles its root in the right hand and any other quality leaves the right
/// hand empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChordSpec {
    pub root: Letter,
    pub accidental: Accidental,
    pub quality: Quality,
    /// Scientific octave of the chord hand (4 = middle C octave)
    pub octave: i32,
    pub voicing: Voicing,
    pub right_hand: Option<RightHand>,
}

impl Default for ChordSpec {
    fn default() -> Self {
        Self {
            root: Letter::C,
            accidental: Accidental::Natural,
            quality: Quality::Single,
            octave: 4,
            voicing: Voicing::Root,
            right_hand: None,
        }
    }
}

impl ChordSpec {
    pub fn new(root: Letter, accidental: Accidental, quality: Quality, octave: i32) -> Self {
        Self {
            root,
            accidental,
            quality,
            octave,
            ..Self::default()
        }
    }

    pub fn with_voicing(mut self, voicing: Voicing) -> Self {
        self.voicing = voicing;
        self
    }

    pub fn with_right_hand(mut self, right_hand: RightHand) -> Self {
        self.right_hand = Some(right_hand);
        self
    }

    pub fn root_pitch_class(&self) -> PitchClass {
        root_pitch_class(self.root, self.accidental)
    }

    /// MIDI number of the root in the chord hand's octave.
    pub fn base_midi(&self) -> i32 {
        12 * (self.octave + 1) + self.root_pitch_class().value() as i32
    }
}

/// Which hands are sent to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum PlayMode {
    #[default]
    Both,
    LeftOnly,
    RightOnly,
}

impl PlayMode {
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "left-only" | "left" => PlayMode::LeftOnly,
            "right-only" | "right" => PlayMode::RightOnly,
            _ => PlayMode::Both,
        }
    }
}

impl From<String> for PlayMode {
    fn from(key: String) -> Self {
        PlayMode::from_key(&key)
    }
}

/// Resolved pitches for both hands
///
/// # Fields
/// - `left_hand_midi` / `left_hand_names`: chord hand after voicing
/// - `right_hand_midi` / `right_hand_names`: right-hand pattern after voicing
/// - `all_midi` / `all_names`: left then right, duplicate MIDI numbers
///   removed, first occurrence kept
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchResult {
    pub left_hand_midi: Vec<i32>,
    pub right_hand_midi: Vec<i32>,
    pub left_hand_names: Vec<String>,
    pub right_hand_names: Vec<String>,
    pub all_midi: Vec<i32>,
    pub all_names: Vec<String>,
}

impl PitchResult {
    pub fn from_hands(left_hand_midi: Vec<i32>, right_hand_midi: Vec<i32>) -> Self {
        let mut all_midi: Vec<i32> = Vec::with_capacity(left_hand_midi.len() + right_hand_midi.len());
        for &midi in left_hand_midi.iter().chain(right_hand_midi.iter()) {
            if !all_midi.contains(&midi) {
                all_midi.push(midi);
            }
        }

        Self {
            left_hand_names: left_hand_midi.iter().map(|&m| midi_to_name(m)).collect(),
            right_hand_names: right_hand_midi.iter().map(|&m| midi_to_name(m)).collect(),
            all_names: all_midi.iter().map(|&m| midi_to_name(m)).collect(),
            left_hand_midi,
            right_hand_midi,
            all_midi,
        }
    }

    /// Names to send to the player for a play mode.
    pub fn names_for(&self, mode: PlayMode) -> Vec<String> {
        match mode {
            PlayMode::Both => self.all_names.clone(),
            PlayMode::LeftOnly => self.left_hand_names.clone(),
            PlayMode::RightOnly => self.right_hand_names.clone(),
        }
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.all_midi.iter().map(|&m| PitchClass::of_midi(m)).collect()
    }
}
