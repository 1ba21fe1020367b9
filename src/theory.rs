//! # Pitch Theory
//!
//! Pitch classes, note letters, accidentals and the MIDI naming rules shared
//! by the resolver, the timeline and the keyboard/wheel views.
//!
//! ## MIDI Numbering
//! - Scientific pitch notation, MIDI 60 = C4 (middle C)
//! - `midi = 12 * (octave + 1) + pitch_class`
//! - Names always use the sharp table: `C C# D D# E F F# G G# A A# B`
//! - Octaves use floor division, so MIDI 11 is `B-1` and MIDI -1 is `B-2`
//!
//! ## Accidentals
//! Sharps and flats shift the natural letter by one semitone and wrap within
//! the octave: `Cb` is pitch class 11 and `B#` is pitch class 0. Flats are
//! never looked up in the sharp table; `Db` is the natural `D` minus one.
//!
//! ## Wheel Data
//! [`circle_of_fifths()`] and [`major_scale()`] give the order and
//! highlighting used by the chromatic / circle-of-fifths wheel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sharp spellings indexed by pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat spellings indexed by pitch class, for display.
pub const FLAT_NAMES: [&str; 12] = [
    "C", "D♭", "D", "E♭", "E", "F", "G♭", "G", "A♭", "A", "B♭", "B",
];

/// Major scale steps from the tonic.
pub const MAJOR_SCALE_STEPS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// One of the 12 equal-tempered pitch classes, always in `0..12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Reduce any semitone count to a pitch class.
    pub fn new(semitones: i32) -> Self {
        Self(semitones.rem_euclid(12) as u8)
    }

    pub fn of_midi(midi: i32) -> Self {
        Self::new(midi)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    pub fn flat_name(self) -> &'static str {
        FLAT_NAMES[self.0 as usize]
    }

    pub fn spelled(self, prefer_flat: bool) -> &'static str {
        if prefer_flat {
            self.flat_name()
        } else {
            self.name()
        }
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }

    /// Whether this pitch class sits on a black piano key.
    pub fn is_black_key(self) -> bool {
        matches!(self.0, 1 | 3 | 6 | 8 | 10)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Natural note letter (A-G)
///
/// Deserializes from a single letter in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Letter {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    pub fn natural_pitch_class(self) -> PitchClass {
        let semitone = match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        };
        PitchClass::new(semitone)
    }

    /// Parse a letter, case-insensitive. Only the first character is read.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().chars().next()?.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }
}

impl TryFrom<String> for Letter {
    type Error = String;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        match Letter::parse(&key) {
            Some(letter) if key.trim().chars().count() == 1 => Ok(letter),
            _ => Err(format!("unknown root note '{}'", key)),
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accidental applied to a root letter
///
/// Unknown keys coming from the UI fall back to `Natural`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "sharp" | "#" | "♯" => Accidental::Sharp,
            "flat" | "b" | "♭" => Accidental::Flat,
            _ => Accidental::Natural,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Accidental::Natural => "natural",
            Accidental::Sharp => "sharp",
            Accidental::Flat => "flat",
        }
    }

    pub fn semitones(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    /// Symbol used in chord display names
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "♯",
            Accidental::Flat => "♭",
        }
    }
}

impl From<String> for Accidental {
    fn from(key: String) -> Self {
        Accidental::from_key(&key)
    }
}

/// Pitch class of a root: natural letter, shifted by the accidental, wrapped.
pub fn root_pitch_class(letter: Letter, accidental: Accidental) -> PitchClass {
    letter.natural_pitch_class().transpose(accidental.semitones())
}

/// Name a MIDI number, e.g. 60 -> "C4", 61 -> "C#4".
pub fn midi_to_name(midi: i32) -> String {
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", PitchClass::of_midi(midi).name(), octave)
}

/// Parse a note name back to a MIDI number.
///
/// Accepts `#`/`♯` and `b`/`♭`, and negative octaves (`B-1` = 11). Unlike
/// chord roots, a note name's accidental may cross the octave boundary:
/// `Cb4` is 59 (B3) and `B#3` is 60 (C4).
pub fn name_to_midi(name: &str) -> Option<i32> {
    let name = name.trim();
    let first = name.chars().next()?;
    let letter = Letter::parse(&first.to_string())?;

    let mut rest = &name[first.len_utf8()..];
    let mut shift = 0;
    if let Some(c) = rest.chars().next() {
        let accidental = match c {
            '#' | '♯' => 1,
            'b' | '♭' => -1,
            _ => 0,
        };
        if accidental != 0 {
            shift = accidental;
            rest = &rest[c.len_utf8()..];
        }
    }

    let octave: i32 = rest.parse().ok()?;
    Some(12 * (octave + 1) + letter.natural_pitch_class().value() as i32 + shift)
}

/// One key of the on-screen piano
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PianoKey {
    pub midi: i32,
    pub pitch_class: PitchClass,
    pub full_name: String,
    pub is_black: bool,
}

/// Keys from `min_midi` to `max_midi` inclusive (A0..C8 is 21..=108).
pub fn keyboard(min_midi: i32, max_midi: i32) -> Vec<PianoKey> {
    (min_midi..=max_midi)
        .map(|midi| {
            let pitch_class = PitchClass::of_midi(midi);
            PianoKey {
                midi,
                pitch_class,
                full_name: midi_to_name(midi),
                is_black: pitch_class.is_black_key(),
            }
        })
        .collect()
}

/// Pitch classes in circle-of-fifths order starting at C.
pub fn circle_of_fifths() -> [PitchClass; 12] {
    let mut circle = [PitchClass::C; 12];
    for (i, slot) in circle.iter_mut().enumerate() {
        *slot = PitchClass::new(i as i32 * 7);
    }
    circle
}

/// The seven pitch classes of the major scale on `tonic`.
pub fn major_scale(tonic: PitchClass) -> Vec<PitchClass> {
    MAJOR_SCALE_STEPS
        .iter()
        .map(|&step| tonic.transpose(step))
        .collect()
}
