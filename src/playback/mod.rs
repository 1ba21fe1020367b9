//! # Playback Module
//!
//! Turn a compose track into timed note calls.
//!
//! ## Purpose
//! 1. **Plan** - [`build_playback_plan()`] gives the start time, duration and
//!    note names of every event on a track at a tempo
//! 2. **Schedule** - [`PlaybackScheduler`] walks that plan in real time,
//!    firing a callback per event, with looping and cancellation
//!
//! ## Sub-modules
//! - `types` - PlaybackPlan, PlaybackStep
//! - `engine` - Plan generation and tempo math
//! - `scheduler` - Tokio-based session runner (feature `scheduler`)
//!
//! ## Timing
//! One count is one beat: `seconds_per_count = 60 / bpm`, and an event of
//! length `n` lasts `n * seconds_per_count`. Each callback fires as its event
//! starts; the session then sleeps for the event's duration.
//!
//! ```text
//! bpm = 60, lengths [2, 3]
//! t=0  on_note_due(A, 2.0)
//! t=2  on_note_due(B, 3.0)
//! t=5  on_complete()          (or back to A when looping)
//! ```
//!
//! ## Sessions
//! Only one session runs per scheduler. Starting a new one, or calling
//! `stop()`, invalidates the previous session's token; the old task checks
//! its token before every step and exits quietly. A stop during a sleep is a
//! normal cancellation, not an error.

mod engine;
#[cfg(feature = "scheduler")]
mod scheduler;
mod types;

#[cfg(all(test, feature = "scheduler"))]
mod tests;

pub use engine::{build_playback_plan, seconds_per_count};
#[cfg(feature = "scheduler")]
pub use scheduler::PlaybackScheduler;
pub use types::{PlaybackPlan, PlaybackStep};
