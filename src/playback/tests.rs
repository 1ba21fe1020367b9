use super::*;
use crate::audio::AudioPlayer;
use crate::theory::{Accidental, Letter};
use crate::{ChordSymbol, Quality, Timeline, Track};

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

type Calls = Arc<Mutex<Vec<(u32, f64, u128)>>>;

fn c_major() -> ChordSymbol {
    ChordSymbol::new(Letter::C, Accidental::Natural, Quality::Major, 4)
}

/// Two events of lengths 2 and 3 on the chord track.
fn two_event_timeline() -> (Timeline, u32, u32) {
    let mut timeline = Timeline::default();
    let a = timeline.add_chord(Track::Chord, c_major(), 2).unwrap();
    let b = timeline.add_chord(Track::Chord, c_major(), 3).unwrap();
    (timeline, a, b)
}

fn recorder(start: Instant) -> (Calls, impl FnMut(&crate::TimelineEvent, f64) + Send + 'static) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let callback = move |event: &crate::TimelineEvent, duration: f64| {
        sink.lock()
            .unwrap()
            .push((event.id, duration, start.elapsed().as_millis()));
    };
    (calls, callback)
}

#[test]
fn test_plan_timing() {
    let (mut timeline, a, _) = two_event_timeline();
    timeline.add_rest(Track::Chord, 1).unwrap();

    let plan = build_playback_plan(&timeline, Track::Chord, 120);
    assert_eq!(plan.seconds_per_count, 0.5);
    let starts: Vec<f64> = plan.steps.iter().map(|s| s.start_time).collect();
    let durations: Vec<f64> = plan.steps.iter().map(|s| s.duration).collect();
    assert_eq!(starts, vec![0.0, 1.0, 2.5]);
    assert_eq!(durations, vec![1.0, 1.5, 0.5]);
    assert_eq!(plan.total_duration, 3.0);
    assert_eq!(plan.steps[0].event.id, a);
    assert!(plan.steps[2].is_rest);
    assert!(plan.steps[2].note_names.is_empty());
}

#[test]
fn test_plan_follows_positions_after_delete() {
    let (mut timeline, a, b) = two_event_timeline();
    let c = timeline.add_rest(Track::Chord, 1).unwrap();
    timeline.delete_event(a).unwrap();

    let plan = build_playback_plan(&timeline, Track::Chord, 60);
    let ids: Vec<u32> = plan.steps.iter().map(|s| s.event.id).collect();
    assert_eq!(ids, vec![b, c]);
    assert_eq!(plan.steps[1].start_time, 3.0);
}

#[test]
fn test_zero_bpm_is_clamped() {
    let (timeline, _, _) = two_event_timeline();
    let plan = build_playback_plan(&timeline, Track::Chord, 0);
    assert_eq!(plan.bpm, 1);
    assert_eq!(plan.seconds_per_count, 60.0);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_fires_on_tempo() {
    let (timeline, a, b) = two_event_timeline();
    let start = Instant::now();
    let (calls, on_note_due) = recorder(start);
    let (done_tx, done_rx) = oneshot::channel();

    let mut scheduler = PlaybackScheduler::new();
    scheduler.play(&timeline, Track::Chord, 60, on_note_due, move || {
        let _ = done_tx.send(start.elapsed().as_millis());
    });
    assert!(scheduler.is_playing());

    let completed_at = done_rx.await.unwrap();
    assert_eq!(*calls.lock().unwrap(), vec![(a, 2.0, 0), (b, 3.0, 2000)]);
    assert_eq!(completed_at, 5000);
    assert!(!scheduler.is_playing());
}

#[tokio::test(start_paused = true)]
async fn test_stop_prevents_pending_callback() {
    let (timeline, a, _) = two_event_timeline();
    let start = Instant::now();
    let (calls, on_note_due) = recorder(start);
    let completed = Arc::new(Mutex::new(false));
    let completed_flag = Arc::clone(&completed);

    let mut scheduler = PlaybackScheduler::new();
    scheduler.play(&timeline, Track::Chord, 60, on_note_due, move || {
        *completed_flag.lock().unwrap() = true;
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    scheduler.stop();
    assert!(!scheduler.is_playing());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(*calls.lock().unwrap(), vec![(a, 2.0, 0)]);
    assert!(!*completed.lock().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_new_play_cancels_previous_session() {
    let (timeline, a, _) = two_event_timeline();
    let start = Instant::now();
    let (first_calls, first) = recorder(start);
    let (second_calls, second) = recorder(start);

    let mut scheduler = PlaybackScheduler::new();
    scheduler.play(&timeline, Track::Chord, 60, first, || {});
    tokio::time::sleep(Duration::from_secs(1)).await;
    scheduler.play(&timeline, Track::Chord, 60, second, || {});
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(first_calls.lock().unwrap().len(), 1);
    let second_ids: Vec<(u32, u128)> = second_calls
        .lock()
        .unwrap()
        .iter()
        .map(|&(id, _, at)| (id, at))
        .collect();
    assert_eq!(second_ids[0], (a, 1000));
    assert_eq!(second_ids.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_looping_restarts_from_first_event() {
    let mut timeline = Timeline::default();
    let a = timeline.add_chord(Track::Melody, c_major(), 1).unwrap();
    let b = timeline.add_rest(Track::Melody, 1).unwrap();

    let start = Instant::now();
    let (calls, on_note_due) = recorder(start);
    let mut scheduler = PlaybackScheduler::new();
    scheduler.set_looping(true);
    assert!(scheduler.is_looping());
    scheduler.play(&timeline, Track::Melody, 60, on_note_due, || {});

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(scheduler.is_playing());
    scheduler.stop();

    let ids: Vec<(u32, u128)> = calls.lock().unwrap().iter().map(|&(id, _, at)| (id, at)).collect();
    assert_eq!(ids, vec![(a, 0), (b, 1000), (a, 2000), (b, 3000)]);
}

#[tokio::test(start_paused = true)]
async fn test_empty_track_completes_immediately() {
    let timeline = Timeline::default();
    let completed = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&completed);

    let mut scheduler = PlaybackScheduler::new();
    scheduler.set_looping(true);
    scheduler.play(&timeline, Track::Bass, 120, |_, _| {}, move || {
        *flag.lock().unwrap() = true;
    });

    assert!(*completed.lock().unwrap());
    assert!(!scheduler.is_playing());
}

#[derive(Default)]
struct RecordingPlayer {
    played: Mutex<Vec<(String, f64)>>,
}

impl AudioPlayer for RecordingPlayer {
    fn ready(&self) -> bool {
        true
    }

    fn play(&self, note_name: &str, _start_time: f64, duration: f64) {
        self.played.lock().unwrap().push((note_name.to_string(), duration));
    }
}

#[tokio::test(start_paused = true)]
async fn test_play_with_player_skips_rests() {
    let mut timeline = Timeline::default();
    timeline.add_rest(Track::Bass, 1).unwrap();
    timeline
        .add_chord(
            Track::Bass,
            ChordSymbol::new(Letter::E, Accidental::Flat, Quality::Major, 2),
            2,
        )
        .unwrap();

    let player = Arc::new(RecordingPlayer::default());
    let (done_tx, done_rx) = oneshot::channel();
    let mut scheduler = PlaybackScheduler::new();
    scheduler.play_with_player(&timeline, Track::Bass, 120, player.clone(), move || {
        let _ = done_tx.send(());
    });
    done_rx.await.unwrap();

    // The bass track sounds the root only
    assert_eq!(*player.played.lock().unwrap(), vec![("D#2".to_string(), 1.0)]);
}
