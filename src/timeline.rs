//! # Compose Timeline
//!
//! Three parallel tracks (melody, chord, bass) of placed chords, single
//! notes and rests, each limited to a fixed number of counts.
//!
//! ## Packing
//! Events on a track never overlap and leave no gaps: sorted by `position`,
//! each event starts where the previous one ends, and the first starts at 0.
//! - `add_event` appends at the current end of the track
//! - `delete_event` removes one event and closes the gap, keeping order
//! - `clear_track` / `clear_all` remove everything on one or all tracks
//!
//! ## Capacity
//! A track holds at most `max_count_per_track` counts (32 by default). An
//! add that would go past it fails with [`ChordError::CapacityExceeded`] and
//! leaves the timeline unchanged.
//!
//! ## Wire Format
//! Events serialize flat, one JSON object each:
//! ```text
//! { "id": 3, "name": "F♯m7", "track": "chord", "isRest": false,
//!   "root": "F", "accidental": "sharp", "type": "m7", "octave": 4,
//!   "length": 2, "position": 4 }
//! ```
//! Rests carry `"isRest": true`, `"root": null`, `"type": "rest"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::chord::{resolve_chord, ChordSpec, PitchResult, Quality};
use crate::error::ChordError;
use crate::theory::{Accidental, Letter};

/// Default capacity of one track, in counts.
pub const DEFAULT_MAX_COUNT: u32 = 32;

/// Octave given to chord events saved without one.
pub const DEFAULT_EVENT_OCTAVE: i32 = 4;

/// Glyph shown for rests
pub const REST_GLYPH: &str = "𝄽";

/// One of the three parallel lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Melody,
    Chord,
    Bass,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::Melody, Track::Chord, Track::Bass];

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "melody" => Some(Track::Melody),
            "chord" => Some(Track::Chord),
            "bass" => Some(Track::Bass),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Track::Melody => "melody",
            Track::Chord => "chord",
            Track::Bass => "bass",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The pitch content of a non-rest event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSymbol {
    pub root: Letter,
    pub accidental: Accidental,
    pub quality: Quality,
    pub octave: i32,
}

impl ChordSymbol {
    pub fn new(root: Letter, accidental: Accidental, quality: Quality, octave: i32) -> Self {
        Self {
            root,
            accidental,
            quality,
            octave,
        }
    }

    /// Name shown on the timeline slot.
    ///
    /// The chord track shows a chord symbol (`B♭m7`); melody and bass show a
    /// note with its octave (`B♭3`).
    pub fn display_name(&self, track: Track) -> String {
        let mut name = format!("{}{}", self.root, self.accidental.symbol());
        match track {
            Track::Chord => name.push_str(self.quality.suffix()),
            Track::Melody | Track::Bass => name.push_str(&self.octave.to_string()),
        }
        name
    }

    /// The chord this symbol sounds as on a track.
    ///
    /// Melody and bass tracks always sound the single root note; the chord
    /// track uses the symbol's quality. Root voicing, single hand.
    pub fn spec_for(&self, track: Track) -> ChordSpec {
        let quality = match track {
            Track::Chord => self.quality,
            Track::Melody | Track::Bass => Quality::Single,
        };
        ChordSpec::new(self.root, self.accidental, quality, self.octave)
    }

    pub fn pitches(&self, track: Track) -> PitchResult {
        resolve_chord(&self.spec_for(track))
    }
}

/// What an event holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventContent {
    Rest,
    Chord(ChordSymbol),
}

/// One placed event on a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEvent", into = "RawEvent")]
pub struct TimelineEvent {
    pub id: u32,
    pub track: Track,
    pub content: EventContent,
    /// Duration in counts, always positive
    pub length: u32,
    /// Start offset in counts on its track
    pub position: u32,
}

impl TimelineEvent {
    pub fn is_rest(&self) -> bool {
        matches!(self.content, EventContent::Rest)
    }

    pub fn chord(&self) -> Option<&ChordSymbol> {
        match &self.content {
            EventContent::Chord(symbol) => Some(symbol),
            EventContent::Rest => None,
        }
    }

    /// Position just after this event
    pub fn end(&self) -> u32 {
        self.position + self.length
    }

    pub fn display_name(&self) -> String {
        match &self.content {
            EventContent::Rest => REST_GLYPH.to_string(),
            EventContent::Chord(symbol) => symbol.display_name(self.track),
        }
    }

    /// Resolved pitches, or `None` for a rest.
    pub fn pitches(&self) -> Option<PitchResult> {
        self.chord().map(|symbol| symbol.pitches(self.track))
    }
}

/// Flat JSON shape of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: u32,
    #[serde(default)]
    name: String,
    track: Track,
    #[serde(default)]
    is_rest: bool,
    #[serde(default)]
    root: Option<Letter>,
    #[serde(default)]
    accidental: Option<Accidental>,
    #[serde(rename = "type", default)]
    quality: Option<String>,
    #[serde(default)]
    octave: Option<i32>,
    length: u32,
    #[serde(default)]
    position: u32,
}

impl From<RawEvent> for TimelineEvent {
    fn from(raw: RawEvent) -> Self {
        let content = match raw.root {
            Some(root) if !raw.is_rest => EventContent::Chord(ChordSymbol {
                root,
                accidental: raw.accidental.unwrap_or_default(),
                quality: raw
                    .quality
                    .as_deref()
                    .map(Quality::from_key)
                    .unwrap_or_default(),
                octave: raw.octave.unwrap_or(DEFAULT_EVENT_OCTAVE),
            }),
            _ => EventContent::Rest,
        };
        Self {
            id: raw.id,
            track: raw.track,
            content,
            length: raw.length,
            position: raw.position,
        }
    }
}

impl From<TimelineEvent> for RawEvent {
    fn from(event: TimelineEvent) -> Self {
        let name = event.display_name();
        match event.content {
            EventContent::Rest => RawEvent {
                id: event.id,
                name,
                track: event.track,
                is_rest: true,
                root: None,
                accidental: Some(Accidental::Natural),
                quality: Some("rest".to_string()),
                octave: None,
                length: event.length,
                position: event.position,
            },
            EventContent::Chord(symbol) => RawEvent {
                id: event.id,
                name,
                track: event.track,
                is_rest: false,
                root: Some(symbol.root),
                accidental: Some(symbol.accidental),
                quality: Some(symbol.quality.key().to_string()),
                octave: Some(symbol.octave),
                length: event.length,
                position: event.position,
            },
        }
    }
}

/// All placed events across the three tracks
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
    max_count_per_track: u32,
    next_id: u32,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COUNT)
    }
}

impl Timeline {
    pub fn new(max_count_per_track: u32) -> Self {
        Self {
            events: Vec::new(),
            max_count_per_track,
            next_id: 1,
        }
    }

    pub fn max_count_per_track(&self) -> u32 {
        self.max_count_per_track
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn get(&self, id: u32) -> Option<&TimelineEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events of one track, sorted by position.
    pub fn events_of(&self, track: Track) -> Vec<&TimelineEvent> {
        let mut events: Vec<&TimelineEvent> =
            self.events.iter().filter(|e| e.track == track).collect();
        events.sort_by_key(|e| e.position);
        events
    }

    /// Sum of lengths over every track.
    pub fn total_count(&self) -> u32 {
        self.events.iter().map(|e| e.length).sum()
    }

    pub fn track_total(&self, track: Track) -> u32 {
        self.events
            .iter()
            .filter(|e| e.track == track)
            .map(|e| e.length)
            .sum()
    }

    /// Counts still free on a track.
    pub fn remaining(&self, track: Track) -> u32 {
        self.max_count_per_track
            .saturating_sub(self.track_total(track))
    }

    /// Append an event at the end of `track` and return its id.
    pub fn add_event(
        &mut self,
        track: Track,
        content: EventContent,
        length: u32,
    ) -> Result<u32, ChordError> {
        if length == 0 {
            return Err(ChordError::InvalidLength(length));
        }

        let current_total = self.track_total(track);
        let fits = current_total
            .checked_add(length)
            .is_some_and(|total| total <= self.max_count_per_track);
        if !fits {
            return Err(ChordError::CapacityExceeded {
                track,
                requested: length,
                available: self.max_count_per_track.saturating_sub(current_total),
            });
        }

        let id = self.next_id;
        let next_id = id
            .checked_add(1)
            .ok_or_else(|| ChordError::InvalidFormat("event ids exhausted".to_string()))?;
        self.next_id = next_id;
        let event = TimelineEvent {
            id,
            track,
            content,
            length,
            position: current_total,
        };
        debug!(id, %track, length, position = current_total, name = %event.display_name(), "added event");
        self.events.push(event);
        Ok(id)
    }

    pub fn add_chord(
        &mut self,
        track: Track,
        symbol: ChordSymbol,
        length: u32,
    ) -> Result<u32, ChordError> {
        self.add_event(track, EventContent::Chord(symbol), length)
    }

    pub fn add_rest(&mut self, track: Track, length: u32) -> Result<u32, ChordError> {
        self.add_event(track, EventContent::Rest, length)
    }

    /// Remove an event and close the gap it leaves on its track.
    pub fn delete_event(&mut self, id: u32) -> Result<TimelineEvent, ChordError> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(ChordError::NotFound(id))?;
        let removed = self.events.remove(index);
        self.repack(removed.track);
        debug!(id, track = %removed.track, "deleted event");
        Ok(removed)
    }

    /// Undo: remove the last event on a track.
    pub fn delete_last(&mut self, track: Track) -> Result<TimelineEvent, ChordError> {
        let id = self
            .events_of(track)
            .last()
            .map(|e| e.id)
            .ok_or(ChordError::TrackEmpty(track))?;
        self.delete_event(id)
    }

    /// Remove every event on a track; returns how many were removed.
    pub fn clear_track(&mut self, track: Track) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.track != track);
        let removed = before - self.events.len();
        debug!(%track, removed, "cleared track");
        removed
    }

    /// Remove every event and restart ids at 1.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.events.len();
        self.events.clear();
        self.next_id = 1;
        debug!(removed, "cleared all tracks");
        removed
    }

    /// Replace the contents with loaded events.
    ///
    /// Each track keeps the loaded relative order and is repacked from 0.
    /// Fails without touching `self` on a zero length, a duplicate id, a
    /// track over capacity or an id with no successor.
    pub fn restore(&mut self, events: Vec<TimelineEvent>) -> Result<(), ChordError> {
        let mut seen = std::collections::HashSet::new();
        for event in &events {
            if event.length == 0 {
                return Err(ChordError::InvalidFormat(format!(
                    "event {} has zero length",
                    event.id
                )));
            }
            if !seen.insert(event.id) {
                return Err(ChordError::InvalidFormat(format!(
                    "duplicate event id {}",
                    event.id
                )));
            }
        }

        for track in Track::ALL {
            let total: u64 = events
                .iter()
                .filter(|e| e.track == track)
                .map(|e| u64::from(e.length))
                .sum();
            if total > u64::from(self.max_count_per_track) {
                return Err(ChordError::InvalidFormat(format!(
                    "track {} holds {} counts, more than {}",
                    track, total, self.max_count_per_track
                )));
            }
        }
        let next_id = events
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| ChordError::InvalidFormat(format!("event id {} is too large", u32::MAX)))?;

        let mut restored = Timeline {
            events,
            max_count_per_track: self.max_count_per_track,
            next_id,
        };
        for track in Track::ALL {
            restored.repack(track);
        }

        *self = restored;
        Ok(())
    }

    /// Reassign positions on a track as running sums of lengths, in
    /// position order.
    fn repack(&mut self, track: Track) {
        let mut indices: Vec<usize> = (0..self.events.len())
            .filter(|&i| self.events[i].track == track)
            .collect();
        indices.sort_by_key(|&i| self.events[i].position);

        let mut position = 0;
        for i in indices {
            self.events[i].position = position;
            position += self.events[i].length;
        }
    }
}
