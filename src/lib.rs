pub mod api;
pub mod audio;
pub mod chord;
pub mod config;
pub mod error;
pub mod persist;
pub mod playback;
pub mod state;
pub mod theory;
pub mod timeline;

pub use api::{resolve_chord_json, wheel, WheelEntry};
pub use audio::{play_chord, play_names, AudioPlayer, TracingPlayer};
pub use chord::{
    resolve_chord, ChordSpec, PitchResult, PlayMode, Quality, RightHand, RightHandPattern,
    RightVoicing, Voicing,
};
pub use config::AppConfig;
pub use error::ChordError;
pub use persist::SavedComposition;
pub use playback::{build_playback_plan, PlaybackPlan, PlaybackStep};
#[cfg(feature = "scheduler")]
pub use playback::PlaybackScheduler;
pub use state::{ComposeState, LearnState};
pub use theory::{midi_to_name, name_to_midi, Accidental, Letter, PitchClass};
pub use timeline::{ChordSymbol, EventContent, Timeline, TimelineEvent, Track};
