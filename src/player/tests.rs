use super::*;
use crate::config::AudioSettings;
use crate::error::OutputError;
use crate::library::Track;

/// Scripted output: records what the controller asked of it.
#[derive(Default)]
struct FakeOutput {
    loaded: Option<String>,
    loads: usize,
    playing: bool,
    reject_play: bool,
    reject_load: bool,
    time: f64,
    volume: f32,
    duration: Option<f64>,
    events: Vec<OutputEvent>,
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, locator: &str) -> Result<(), OutputError> {
        if self.reject_load {
            self.loaded = None;
            self.playing = false;
            return Err(OutputError::NoSource);
        }
        self.loaded = Some(locator.to_string());
        self.loads += 1;
        self.playing = false;
        self.time = 0.0;
        Ok(())
    }

    fn play(&mut self) -> Result<(), OutputError> {
        if self.reject_play || self.loaded.is_none() {
            return Err(OutputError::NoSource);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.time = secs;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn drain_events(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.events)
    }
}

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: id.to_uppercase(),
        artist_id: "unknown-artist".to_string(),
        artist_name: None,
        album: None,
        audio_url: format!("/music/{id}.mp3"),
        cover_image_url: None,
        duration: Some(200.0),
        likes: 0,
        display: id.to_string(),
    }
}

fn controller() -> PlaybackController<FakeOutput> {
    PlaybackController::new(FakeOutput::default(), &AudioSettings::default())
}

fn ids(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn starts_stopped_with_initial_volume_applied() {
    let c = controller();
    assert_eq!(c.transport(), TransportState::Stopped);
    assert!(c.current_track().is_none());
    assert!(c.queue().is_empty());
    assert_eq!(c.volume(), 0.8);
    assert_eq!(c.output().volume, 0.8);
}

#[test]
fn playing_a_different_track_loads_it_from_zero() {
    let mut c = controller();
    c.play(track("a"), None);
    c.seek(42.0);
    c.play(track("b"), None);

    assert_eq!(c.current_track().unwrap().id, "b");
    assert_eq!(c.position(), 0.0);
    assert_eq!(c.transport(), TransportState::Playing);
    assert_eq!(c.output().loaded.as_deref(), Some("/music/b.mp3"));
    assert_eq!(c.duration(), 200.0);
}

#[test]
fn first_play_without_context_seeds_a_single_track_queue() {
    let mut c = controller();
    c.play(track("a"), None);
    assert_eq!(ids(c.queue()), vec!["a"]);

    // The queue only seeds when empty; a later ad-hoc play leaves it alone.
    c.play(track("b"), None);
    assert_eq!(ids(c.queue()), vec!["a"]);
    assert_eq!(c.snapshot().queue_index, None);
}

#[test]
fn playing_the_current_track_toggles_without_reload() {
    let mut c = controller();
    c.play(track("a"), None);
    c.seek(12.5);

    c.play(track("a"), None);
    assert_eq!(c.transport(), TransportState::Paused);
    assert_eq!(c.position(), 12.5);
    assert!(!c.output().playing);

    c.play(track("a"), None);
    assert_eq!(c.transport(), TransportState::Playing);
    assert_eq!(c.position(), 12.5);
    assert_eq!(c.output().loads, 1);
}

#[test]
fn context_queue_always_replaces_the_previous_queue() {
    let mut c = controller();
    c.play(track("x"), Some(vec![track("x"), track("y")]));
    c.play(track("b"), Some(vec![track("a"), track("b"), track("c")]));
    assert_eq!(ids(c.queue()), vec!["a", "b", "c"]);
    assert_eq!(c.snapshot().queue_index, Some(1));
}

#[test]
fn rejected_play_request_does_not_advance_to_playing() {
    let mut c = controller();
    c.output_mut().reject_play = true;
    c.play(track("a"), None);

    assert_eq!(c.current_track().unwrap().id, "a");
    assert_eq!(c.transport(), TransportState::Stopped);

    // The user can retry once the output accepts playback.
    c.output_mut().reject_play = false;
    c.toggle_play_pause();
    assert_eq!(c.transport(), TransportState::Playing);
}

#[test]
fn toggle_without_a_track_is_a_no_op() {
    let mut c = controller();
    c.toggle_play_pause();
    assert_eq!(c.transport(), TransportState::Stopped);
    assert!(!c.output().playing);
}

#[test]
fn next_on_the_last_track_stops_but_keeps_the_queue() {
    let mut c = controller();
    let queue = vec![track("a"), track("b")];
    c.play(track("b"), Some(queue));
    c.seek(30.0);

    c.play_next();
    assert_eq!(c.transport(), TransportState::Stopped);
    assert_eq!(c.position(), 0.0);
    assert_eq!(ids(c.queue()), vec!["a", "b"]);
    assert_eq!(c.current_track().unwrap().id, "b");
    assert!(!c.output().playing);
}

#[test]
fn next_when_current_is_not_queued_is_treated_as_end_of_queue() {
    let mut c = controller();
    c.play(track("a"), None);
    c.play(track("z"), None);
    c.play_next();
    assert_eq!(c.transport(), TransportState::Stopped);
    assert_eq!(c.current_track().unwrap().id, "z");
}

#[test]
fn prev_past_threshold_restarts_the_same_track() {
    let mut c = controller();
    c.play(track("b"), Some(vec![track("a"), track("b")]));
    c.output_mut().time = 3.5;
    c.handle_event(OutputEvent::TimeUpdate { position: 3.5 });

    c.play_prev();
    assert_eq!(c.current_track().unwrap().id, "b");
    assert_eq!(c.position(), 0.0);
    assert_eq!(c.output().time, 0.0);
    assert_eq!(c.transport(), TransportState::Playing);
    assert_eq!(c.output().loads, 1);
}

#[test]
fn prev_under_threshold_steps_back_in_the_queue() {
    let mut c = controller();
    c.play(track("b"), Some(vec![track("a"), track("b")]));
    c.output_mut().time = 2.0;

    c.play_prev();
    assert_eq!(c.current_track().unwrap().id, "a");
    assert_eq!(c.transport(), TransportState::Playing);
}

#[test]
fn prev_on_first_entry_under_threshold_changes_nothing() {
    let mut c = controller();
    c.play(track("a"), Some(vec![track("a"), track("b")]));
    c.seek(3.0);
    let before = c.snapshot();

    c.play_prev();
    assert_eq!(c.snapshot(), before);
    assert_eq!(c.output().loads, 1);
}

#[test]
fn volume_survives_track_changes() {
    let mut c = controller();
    c.play(track("a"), None);
    c.set_volume(0.3);
    c.play(track("b"), None);
    assert_eq!(c.volume(), 0.3);
    assert_eq!(c.output().volume, 0.3);
}

#[test]
fn volume_is_clamped_to_unit_range() {
    let mut c = controller();
    c.set_volume(1.7);
    assert_eq!(c.volume(), 1.0);
    c.set_volume(-0.2);
    assert_eq!(c.volume(), 0.0);
}

#[test]
fn seek_mirrors_position_immediately() {
    let mut c = controller();
    c.play(track("a"), None);
    c.seek(61.0);
    assert_eq!(c.position(), 61.0);
    assert_eq!(c.output().time, 61.0);

    c.seek_by(500.0);
    assert_eq!(c.position(), 200.0);
    c.seek_by(-500.0);
    assert_eq!(c.position(), 0.0);
}

#[test]
fn metadata_overrides_the_stored_duration_and_resumes() {
    let mut c = controller();
    let mut t = track("a");
    t.duration = None;
    c.play(t, None);
    assert_eq!(c.duration(), 0.0);

    c.output_mut().playing = false;
    c.output_mut()
        .events
        .push(OutputEvent::LoadedMetadata { duration: Some(187.4) });
    c.pump_events();
    assert_eq!(c.duration(), 187.4);
    assert!(c.output().playing);
}

#[test]
fn metadata_without_a_length_keeps_the_seeded_duration() {
    let mut c = controller();
    c.play(track("a"), None);
    c.handle_event(OutputEvent::LoadedMetadata { duration: None });
    assert_eq!(c.duration(), 200.0);
}

#[test]
fn error_event_forces_stopped() {
    let mut c = controller();
    c.play(track("a"), None);
    c.handle_event(OutputEvent::Error {
        message: "decode failed".into(),
    });
    assert_eq!(c.transport(), TransportState::Stopped);
    assert_eq!(c.current_track().unwrap().id, "a");
}

#[test]
fn natural_end_walks_the_queue_then_stops() {
    let mut c = controller();
    let queue = vec![track("t1"), track("t2"), track("t3")];
    c.play(track("t1"), Some(queue));
    c.handle_event(OutputEvent::TimeUpdate { position: 199.0 });

    c.output_mut().events.push(OutputEvent::Ended);
    c.pump_events();
    assert_eq!(c.current_track().unwrap().id, "t2");
    assert_eq!(c.transport(), TransportState::Playing);
    assert_eq!(c.position(), 0.0);

    c.handle_event(OutputEvent::Ended);
    assert_eq!(c.current_track().unwrap().id, "t3");

    c.handle_event(OutputEvent::TimeUpdate { position: 150.0 });
    c.handle_event(OutputEvent::Ended);
    assert_eq!(c.transport(), TransportState::Stopped);
    assert_eq!(c.position(), 0.0);
    assert_eq!(ids(c.queue()), vec!["t1", "t2", "t3"]);
}

#[test]
fn failed_load_while_playing_leaves_the_transport_stopped() {
    let mut c = controller();
    c.play(track("a"), None);
    assert_eq!(c.transport(), TransportState::Playing);

    c.output_mut().reject_load = true;
    c.play(track("b"), None);

    assert_eq!(c.current_track().unwrap().id, "b");
    assert_eq!(c.transport(), TransportState::Stopped);
    assert!(c.output().events.is_empty());

    // Retrying once the file is readable loads it again.
    c.output_mut().reject_load = false;
    c.play(track("c"), None);
    assert_eq!(c.transport(), TransportState::Playing);
    assert_eq!(c.output().loaded.as_deref(), Some("/music/c.mp3"));
}

#[test]
fn play_after_the_queue_ran_out_replays_the_last_track() {
    let mut c = controller();
    c.play(track("only"), None);
    c.handle_event(OutputEvent::Ended);
    assert_eq!(c.transport(), TransportState::Stopped);
    assert_eq!(c.output().time, 0.0);

    c.play(track("only"), None);
    assert_eq!(c.transport(), TransportState::Playing);
    assert!(c.output().playing);
    assert_eq!(c.output().loads, 1);
}
