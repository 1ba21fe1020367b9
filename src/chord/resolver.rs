//! Chord-to-pitch resolution
//!
//! Turns a [`ChordSpec`] into the exact MIDI pitches and note names each
//! hand plays. Resolution is pure and total: it never fails.

use tracing::trace;

use super::types::{ChordSpec, PitchResult, Quality, RightHand, RightVoicing, Voicing};

/// Resolve a chord specification into left- and right-hand pitches.
///
/// # Algorithm
/// 1. Root pitch class from the letter and accidental, wrapped mod 12
/// 2. Base MIDI = `12 * (octave + 1) + pitch_class`
/// 3. Left hand = base + each interval of the quality
/// 4. Voicing applied to the left hand (chords of two or more notes only)
/// 5. Right hand from its pattern, or the single-hand default
/// 6. Open right-hand voicing spreads the i-th note by `2 * i` semitones
/// 7. Names from the sharp table with floored octaves
///
/// # Examples
/// ```
/// use chordlab::{resolve_chord, Accidental, ChordSpec, Letter, Quality, Voicing};
///
/// let c_major = ChordSpec::new(Letter::C, Accidental::Natural, Quality::Major, 4);
/// assert_eq!(resolve_chord(&c_major).left_hand_names, vec!["C4", "E4", "G4"]);
///
/// let first = c_major.with_voicing(Voicing::FirstInversion);
/// assert_eq!(resolve_chord(&first).left_hand_names, vec!["E4", "G4", "C5"]);
/// ```
pub fn resolve_chord(spec: &ChordSpec) -> PitchResult {
    let base_midi = spec.base_midi();
    let intervals = spec.quality.intervals();

    let mut left_hand: Vec<i32> = intervals.iter().map(|i| base_midi + i).collect();
    if spec.quality != Quality::Single && left_hand.len() >= 2 {
        apply_voicing(&mut left_hand, spec.voicing, base_midi);
    }

    let right_hand = match &spec.right_hand {
        Some(right) => right_hand_notes(base_midi, intervals, right),
        None if spec.quality == Quality::Single => vec![base_midi],
        None => Vec::new(),
    };

    trace!(
        ?spec,
        base_midi,
        ?left_hand,
        ?right_hand,
        "resolved chord"
    );

    PitchResult::from_hands(left_hand, right_hand)
}

/// Rearrange chord-hand notes in place for a voicing.
///
/// Only octave placement changes; the pitch classes stay the same.
/// - First inversion: the lowest note moves up an octave to the top
/// - Second inversion: the two lowest notes move up, in order (three or more notes)
/// - Spread: `base_midi + 12` joins the chord, result sorted ascending
pub fn apply_voicing(notes: &mut Vec<i32>, voicing: Voicing, base_midi: i32) {
    match voicing {
        Voicing::Root => {}
        Voicing::FirstInversion => {
            if !notes.is_empty() {
                let lowest = notes.remove(0);
                notes.push(lowest + 12);
            }
        }
        Voicing::SecondInversion => {
            if notes.len() >= 3 {
                let first = notes.remove(0);
                let second = notes.remove(0);
                notes.push(first + 12);
                notes.push(second + 12);
            }
        }
        Voicing::Spread => {
            notes.push(base_midi + 12);
            notes.sort_unstable();
        }
    }
}

fn right_hand_notes(base_midi: i32, intervals: &[i32], right: &RightHand) -> Vec<i32> {
    let notes = right.pattern.generate(base_midi, intervals, right.octave_shift);
    if right.voicing == RightVoicing::Open && notes.len() >= 2 {
        notes
            .into_iter()
            .enumerate()
            .map(|(index, midi)| midi + 2 * index as i32)
            .collect()
    } else {
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{PlayMode, RightHandPattern};
    use crate::theory::{root_pitch_class, Accidental, Letter, PitchClass};
    use std::collections::BTreeSet;

    fn spec(root: Letter, accidental: Accidental, quality: Quality, octave: i32) -> ChordSpec {
        ChordSpec::new(root, accidental, quality, octave)
    }

    fn pitch_class_set(midi: &[i32]) -> BTreeSet<u8> {
        midi.iter().map(|&m| PitchClass::of_midi(m).value()).collect()
    }

    #[test]
    fn test_c_major_root_position() {
        let result = resolve_chord(&spec(Letter::C, Accidental::Natural, Quality::Major, 4));
        assert_eq!(result.left_hand_midi, vec![60, 64, 67]);
        assert_eq!(result.left_hand_names, vec!["C4", "E4", "G4"]);
        assert!(result.right_hand_midi.is_empty());
        assert_eq!(result.all_names, vec!["C4", "E4", "G4"]);
    }

    #[test]
    fn test_first_inversion() {
        let c = spec(Letter::C, Accidental::Natural, Quality::Major, 4)
            .with_voicing(Voicing::FirstInversion);
        assert_eq!(resolve_chord(&c).left_hand_names, vec!["E4", "G4", "C5"]);
    }

    #[test]
    fn test_second_inversion() {
        let c = spec(Letter::C, Accidental::Natural, Quality::Major, 4)
            .with_voicing(Voicing::SecondInversion);
        assert_eq!(resolve_chord(&c).left_hand_names, vec!["G4", "C5", "E5"]);

        // Seventh chords keep their upper two notes at the bottom
        let g7 = spec(Letter::G, Accidental::Natural, Quality::Dominant7, 3)
            .with_voicing(Voicing::SecondInversion);
        assert_eq!(resolve_chord(&g7).left_hand_midi, vec![62, 65, 67, 71]);
    }

    #[test]
    fn test_spread_voicing_adds_sorted_octave_root() {
        let c = spec(Letter::C, Accidental::Natural, Quality::Major, 4).with_voicing(Voicing::Spread);
        let result = resolve_chord(&c);
        assert_eq!(result.left_hand_midi, vec![60, 64, 67, 72]);

        let am7 = spec(Letter::A, Accidental::Natural, Quality::Minor7, 3).with_voicing(Voicing::Spread);
        let result = resolve_chord(&am7);
        assert_eq!(result.left_hand_midi, vec![57, 60, 64, 67, 69]);
    }

    #[test]
    fn test_a_sharp_minor7_pitch_classes() {
        let result = resolve_chord(&spec(Letter::A, Accidental::Sharp, Quality::Minor7, 3));
        assert_eq!(result.left_hand_midi, vec![58, 61, 65, 68]);
        assert_eq!(
            pitch_class_set(&result.left_hand_midi),
            [10, 1, 5, 8].into_iter().collect()
        );
    }

    #[test]
    fn test_flats_use_natural_letter_minus_one() {
        let db = resolve_chord(&spec(Letter::D, Accidental::Flat, Quality::Major, 4));
        assert_eq!(db.left_hand_names, vec!["C#4", "F4", "G#4"]);

        // Accidentals wrap within the octave of the root
        let cb = resolve_chord(&spec(Letter::C, Accidental::Flat, Quality::Single, 4));
        assert_eq!(cb.left_hand_names, vec!["B4"]);
        let b_sharp = resolve_chord(&spec(Letter::B, Accidental::Sharp, Quality::Single, 3));
        assert_eq!(b_sharp.left_hand_names, vec!["C3"]);
    }

    #[test]
    fn test_voicing_preserves_pitch_classes() {
        let voicings = [
            Voicing::Root,
            Voicing::FirstInversion,
            Voicing::SecondInversion,
            Voicing::Spread,
        ];
        let accidentals = [Accidental::Natural, Accidental::Sharp, Accidental::Flat];

        for letter in Letter::ALL {
            for accidental in accidentals {
                for quality in Quality::ALL {
                    for octave in [-1, 0, 3, 4, 7] {
                        let root = root_pitch_class(letter, accidental).value() as i32;
                        let expected: BTreeSet<u8> = quality
                            .intervals()
                            .iter()
                            .map(|i| PitchClass::new(root + i).value())
                            .collect();
                        for voicing in voicings {
                            let chord = spec(letter, accidental, quality, octave).with_voicing(voicing);
                            let result = resolve_chord(&chord);
                            assert_eq!(
                                pitch_class_set(&result.left_hand_midi),
                                expected,
                                "{:?}",
                                chord
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_hand_none_quality_doubles_root_once() {
        let result = resolve_chord(&spec(Letter::E, Accidental::Natural, Quality::Single, 4));
        assert_eq!(result.left_hand_midi, vec![64]);
        assert_eq!(result.right_hand_midi, vec![64]);
        assert_eq!(result.all_names, vec!["E4"]);
    }

    #[test]
    fn test_single_note_ignores_voicing() {
        let note = spec(Letter::E, Accidental::Natural, Quality::Single, 4)
            .with_voicing(Voicing::FirstInversion);
        assert_eq!(resolve_chord(&note).left_hand_midi, vec![64]);
    }

    #[test]
    fn test_right_hand_patterns() {
        let base = spec(Letter::C, Accidental::Natural, Quality::Major, 3);
        let with = |pattern| {
            resolve_chord(&base.with_right_hand(RightHand {
                pattern,
                octave_shift: 1,
                voicing: RightVoicing::Close,
            }))
            .right_hand_midi
        };

        assert_eq!(with(RightHandPattern::Empty), Vec::<i32>::new());
        assert_eq!(with(RightHandPattern::Root), vec![60]);
        assert_eq!(with(RightHandPattern::ChordTones), vec![60, 64, 67]);
        assert_eq!(with(RightHandPattern::Arpeggio), vec![72, 76, 79]);
        assert_eq!(with(RightHandPattern::OctaveDouble), vec![60, 72]);
        assert_eq!(with(RightHandPattern::Fifth), vec![67]);
    }

    #[test]
    fn test_fifth_pattern_on_single_note_uses_last_interval() {
        let note = spec(Letter::C, Accidental::Natural, Quality::Single, 3).with_right_hand(RightHand {
            pattern: RightHandPattern::Fifth,
            octave_shift: 0,
            voicing: RightVoicing::Close,
        });
        assert_eq!(resolve_chord(&note).right_hand_midi, vec![48]);
    }

    #[test]
    fn test_open_right_voicing_spreads_progressively() {
        let chord = spec(Letter::C, Accidental::Natural, Quality::Major7, 3).with_right_hand(RightHand {
            pattern: RightHandPattern::ChordTones,
            octave_shift: 1,
            voicing: RightVoicing::Open,
        });
        let result = resolve_chord(&chord);
        assert_eq!(result.right_hand_midi, vec![60, 66, 71, 77]);

        // A single right-hand note is left alone
        let root_only = chord.with_right_hand(RightHand {
            pattern: RightHandPattern::Root,
            octave_shift: 1,
            voicing: RightVoicing::Open,
        });
        assert_eq!(resolve_chord(&root_only).right_hand_midi, vec![60]);
    }

    #[test]
    fn test_all_names_deduplicates_across_hands() {
        let chord = spec(Letter::C, Accidental::Natural, Quality::Major, 4)
            .with_voicing(Voicing::Spread)
            .with_right_hand(RightHand {
                pattern: RightHandPattern::OctaveDouble,
                octave_shift: 1,
                voicing: RightVoicing::Close,
            });
        let result = resolve_chord(&chord);
        assert_eq!(result.left_hand_midi, vec![60, 64, 67, 72]);
        assert_eq!(result.right_hand_midi, vec![72, 84]);
        assert_eq!(result.all_midi, vec![60, 64, 67, 72, 84]);
        assert_eq!(result.all_names, vec!["C4", "E4", "G4", "C5", "C6"]);
    }

    #[test]
    fn test_play_mode_selects_hands() {
        let chord = spec(Letter::F, Accidental::Natural, Quality::Major, 3)
            .with_right_hand(RightHand::default());
        let result = resolve_chord(&chord);
        assert_eq!(result.names_for(PlayMode::LeftOnly), vec!["F3", "A3", "C4"]);
        assert_eq!(result.names_for(PlayMode::RightOnly), vec!["F4"]);
        assert_eq!(result.names_for(PlayMode::Both), vec!["F3", "A3", "C4", "F4"]);
    }

    #[test]
    fn test_low_octave_names_floor() {
        let result = resolve_chord(&spec(Letter::A, Accidental::Natural, Quality::Minor, -1));
        assert_eq!(result.left_hand_midi, vec![9, 12, 16]);
        assert_eq!(result.left_hand_names, vec!["A-1", "C0", "E0"]);

        let below_zero = resolve_chord(&spec(Letter::B, Accidental::Natural, Quality::Single, -2));
        assert_eq!(below_zero.left_hand_names, vec!["B-2"]);
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        let json = r#"{"root":"G","accidental":"weird","quality":"ninth","octave":3,"voicing":"drop2"}"#;
        let chord: ChordSpec = serde_json::from_str(json).unwrap();
        assert_eq!(chord.quality, Quality::Single);
        assert_eq!(chord.voicing, Voicing::Root);
        assert_eq!(chord.accidental, Accidental::Natural);
        assert_eq!(resolve_chord(&chord).all_names, vec!["G3"]);

        let pattern: RightHandPattern = serde_json::from_str("\"zigzag\"").unwrap();
        assert_eq!(pattern, RightHandPattern::Root);
    }
}
