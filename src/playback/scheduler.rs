//! Real-time playback of a track
//!
//! A [`PlaybackScheduler`] runs at most one session at a time on a Tokio
//! task. Each session holds a token; [`PlaybackScheduler::stop`] and every new
//! [`PlaybackScheduler::play`] replace the token, and a session checks it
//! before each step, so a stale session never fires another callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::engine::build_playback_plan;
use super::types::PlaybackPlan;
use crate::audio::{play_names, AudioPlayer};
use crate::timeline::{Timeline, TimelineEvent, Track};

/// Plays one track at a time, with looping and cancellation
///
/// `on_note_due` runs while the session lock is held so that `stop()` can
/// never race with it. It must not call back into the scheduler.
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    session: Arc<Mutex<u64>>,
    playing: Arc<AtomicBool>,
    looping: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

fn lock(session: &Mutex<u64>) -> MutexGuard<'_, u64> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::SeqCst)
    }

    /// Takes effect at the end of the current pass.
    pub fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::SeqCst);
    }

    /// Start playing `track` at `bpm`, cancelling any running session.
    ///
    /// `on_note_due(event, duration_seconds)` fires as each event starts,
    /// rests included. When the track ends without looping, `is_playing`
    /// is cleared and `on_complete` fires. An empty track completes at once.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn play<F, C>(
        &mut self,
        timeline: &Timeline,
        track: Track,
        bpm: u32,
        on_note_due: F,
        on_complete: C,
    ) where
        F: FnMut(&TimelineEvent, f64) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let plan = build_playback_plan(timeline, track, bpm);
        self.play_plan(plan, on_note_due, on_complete);
    }

    /// Play a track through an audio player.
    ///
    /// Rests are silent. Notes requested while the player is not ready are
    /// dropped; the session keeps its timing.
    pub fn play_with_player<C>(
        &mut self,
        timeline: &Timeline,
        track: Track,
        bpm: u32,
        player: Arc<dyn AudioPlayer>,
        on_complete: C,
    ) where
        C: FnOnce() + Send + 'static,
    {
        self.play(
            timeline,
            track,
            bpm,
            move |event, duration| {
                let Some(pitches) = event.pitches() else {
                    debug!(id = event.id, "rest");
                    return;
                };
                if let Err(e) = play_names(player.as_ref(), &pitches.all_names, duration) {
                    warn!(id = event.id, "{}", e);
                }
            },
            on_complete,
        );
    }

    /// Run a prepared plan. See [`PlaybackScheduler::play`].
    pub fn play_plan<F, C>(&mut self, plan: PlaybackPlan, mut on_note_due: F, on_complete: C)
    where
        F: FnMut(&TimelineEvent, f64) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        self.stop();

        if plan.is_empty() {
            info!(track = %plan.track, "nothing to play");
            on_complete();
            return;
        }

        let token = {
            let mut session = lock(&self.session);
            *session += 1;
            *session
        };
        self.playing.store(true, Ordering::SeqCst);
        info!(track = %plan.track, bpm = plan.bpm, steps = plan.steps.len(), "playback started");

        let session = Arc::clone(&self.session);
        let playing = Arc::clone(&self.playing);
        let looping = Arc::clone(&self.looping);

        self.task = Some(tokio::spawn(async move {
            loop {
                for step in &plan.steps {
                    {
                        let current = lock(&session);
                        if *current != token {
                            return;
                        }
                        on_note_due(&step.event, step.duration);
                    }
                    tokio::time::sleep(Duration::from_secs_f64(step.duration)).await;
                }
                if !looping.load(Ordering::SeqCst) {
                    break;
                }
                debug!(track = %plan.track, "looping");
            }

            {
                let current = lock(&session);
                if *current != token {
                    return;
                }
                playing.store(false, Ordering::SeqCst);
            }
            info!(track = %plan.track, "playback complete");
            on_complete();
        }));
    }

    /// Cancel the running session, if any.
    ///
    /// After this returns no further `on_note_due` fires and `is_playing`
    /// is false. Stopping an idle scheduler does nothing.
    pub fn stop(&mut self) {
        *lock(&self.session) += 1;
        let was_playing = self.playing.swap(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if was_playing {
            info!("playback stopped");
        }
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
