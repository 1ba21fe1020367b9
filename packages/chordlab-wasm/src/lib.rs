use chordlab::theory::{keyboard, name_to_midi as parse_name};
use chordlab::{
    Accidental, AppConfig, ChordError, ComposeState, Letter, Quality, TimelineEvent, Track,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct ErrorPayload {
    kind: &'static str,
    message: String,
}

fn error_kind(e: &ChordError) -> &'static str {
    match e {
        ChordError::CapacityExceeded { .. } => "capacity-exceeded",
        ChordError::NotFound(_) => "not-found",
        ChordError::TrackEmpty(_) => "track-empty",
        ChordError::InvalidFormat(_) => "invalid-format",
        ChordError::AudioUnavailable => "audio-unavailable",
        ChordError::NoRootSelected => "no-root-selected",
        ChordError::InvalidLength(_) => "invalid-length",
        ChordError::ConfigError(_) => "config-error",
        ChordError::Io(_) => "io",
    }
}

fn to_js_error(e: ChordError) -> JsValue {
    let payload = ErrorPayload {
        kind: error_kind(&e),
        message: e.to_string(),
    };
    match serde_json::to_string(&payload) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&payload.message),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_track(track: &str) -> Result<Track, JsValue> {
    Track::from_key(track)
        .ok_or_else(|| to_js_error(ChordError::InvalidFormat(format!("unknown track '{}'", track))))
}

/// Resolve a chord spec given as JSON; returns the PitchResult as JSON
#[wasm_bindgen(js_name = resolveChord)]
pub fn resolve_chord(spec_json: &str) -> Result<String, JsValue> {
    let result = chordlab::resolve_chord_json(spec_json).map_err(to_js_error)?;
    to_json(&result)
}

#[wasm_bindgen(js_name = midiToName)]
pub fn midi_to_name(midi: i32) -> String {
    chordlab::midi_to_name(midi)
}

/// MIDI number of a note name, or `undefined` if it does not parse
#[wasm_bindgen(js_name = nameToMidi)]
pub fn name_to_midi(name: &str) -> Option<i32> {
    parse_name(name)
}

/// Circle of fifths with each key's major scale, as JSON
#[wasm_bindgen(js_name = circleOfFifths)]
pub fn circle_of_fifths(prefer_flat: bool) -> Result<String, JsValue> {
    to_json(&chordlab::wheel(prefer_flat))
}

/// Piano keys between two MIDI numbers, as JSON
#[wasm_bindgen(js_name = keyboardKeys)]
pub fn keyboard_keys(min_midi: i32, max_midi: i32) -> Result<String, JsValue> {
    to_json(&keyboard(min_midi, max_midi))
}

/// Compose-mode session: selection, timeline and tempo
#[wasm_bindgen]
pub struct Composer {
    state: ComposeState,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Composer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Composer {
        Composer {
            state: ComposeState::default(),
        }
    }

    /// Build a session from a YAML configuration
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(yaml: &str) -> Result<Composer, JsValue> {
        let config = AppConfig::from_yaml_str(yaml).map_err(to_js_error)?;
        Ok(Composer {
            state: ComposeState::new(config),
        })
    }

    /// Pick the root letter; an empty string clears the selection
    #[wasm_bindgen(js_name = setRoot)]
    pub fn set_root(&mut self, root: &str) {
        self.state.current_root = Letter::parse(root);
    }

    #[wasm_bindgen(js_name = setAccidental)]
    pub fn set_accidental(&mut self, accidental: &str) {
        self.state.current_accidental = Accidental::from_key(accidental);
    }

    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, quality: &str) {
        self.state.current_quality = Quality::from_key(quality);
    }

    #[wasm_bindgen(js_name = setLength)]
    pub fn set_length(&mut self, length: u32) -> Result<(), JsValue> {
        self.state.set_length(length).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setOctave)]
    pub fn set_octave(&mut self, octave: i32) -> i32 {
        self.state.set_octave(octave);
        self.state.current_octave()
    }

    #[wasm_bindgen(js_name = setTrack)]
    pub fn set_track(&mut self, track: &str) -> Result<(), JsValue> {
        self.state.active_track = parse_track(track)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setBpm)]
    pub fn set_bpm(&mut self, bpm: u32) {
        self.state.set_bpm(bpm);
    }

    pub fn bpm(&self) -> u32 {
        self.state.bpm()
    }

    #[wasm_bindgen(js_name = currentName)]
    pub fn current_name(&self) -> Option<String> {
        self.state.current_name()
    }

    #[wasm_bindgen(js_name = addCurrent)]
    pub fn add_current(&mut self) -> Result<u32, JsValue> {
        self.state.add_current().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = addRest)]
    pub fn add_rest(&mut self) -> Result<u32, JsValue> {
        self.state.add_rest().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = deleteEvent)]
    pub fn delete_event(&mut self, id: u32) -> Result<(), JsValue> {
        self.state
            .timeline
            .delete_event(id)
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Undo the last add on the active track; returns the removed event as JSON
    #[wasm_bindgen(js_name = deleteLast)]
    pub fn delete_last(&mut self) -> Result<String, JsValue> {
        let removed = self.state.undo().map_err(to_js_error)?;
        to_json(&removed)
    }

    #[wasm_bindgen(js_name = clearTrack)]
    pub fn clear_track(&mut self, track: &str) -> Result<usize, JsValue> {
        let track = parse_track(track)?;
        Ok(self.state.timeline.clear_track(track))
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> usize {
        self.state.timeline.clear_all()
    }

    #[wasm_bindgen(js_name = totalCount)]
    pub fn total_count(&self) -> u32 {
        self.state.timeline.total_count()
    }

    #[wasm_bindgen(js_name = trackTotal)]
    pub fn track_total(&self, track: &str) -> Result<u32, JsValue> {
        Ok(self.state.timeline.track_total(parse_track(track)?))
    }

    #[wasm_bindgen(js_name = maxCount)]
    pub fn max_count(&self) -> u32 {
        self.state.timeline.max_count_per_track()
    }

    #[wasm_bindgen(js_name = highlightMs)]
    pub fn highlight_ms(&self) -> u64 {
        self.state.config().highlight_ms
    }

    /// Events of one track in position order, or of all tracks, as JSON
    #[wasm_bindgen(js_name = eventsJson)]
    pub fn events_json(&self, track: Option<String>) -> Result<String, JsValue> {
        match track {
            Some(track) => {
                let events: Vec<&TimelineEvent> =
                    self.state.timeline.events_of(parse_track(&track)?);
                to_json(&events)
            }
            None => to_json(&self.state.timeline.events()),
        }
    }

    #[wasm_bindgen(js_name = saveJson)]
    pub fn save_json(&self) -> Result<String, JsValue> {
        self.state.save_json().map_err(to_js_error)
    }

    /// Replace the session from a saved document; unchanged on error
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.state.load_json(json).map_err(to_js_error)
    }

    /// Timed steps of the active track at the current tempo, as JSON
    #[wasm_bindgen(js_name = playbackPlanJson)]
    pub fn playback_plan_json(&self) -> Result<String, JsValue> {
        to_json(&self.state.playback_plan())
    }
}
