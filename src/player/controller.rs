//! The playback state machine.
//!
//! `PlaybackController` is the only thing that mutates the audio output. UI
//! code calls the transport methods below; output notifications come back in
//! through [`PlaybackController::handle_event`], one at a time.

use std::time::Duration;

use tracing::{debug, error, warn};

use crate::audio::SampleTap;
use crate::config::AudioSettings;
use crate::error::TapError;
use crate::library::Track;

use super::output::{AudioOutput, OutputEvent};
use super::transport::TransportState;

/// Read-only view of the controller for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub track: Option<Track>,
    pub transport: TransportState,
    pub position: f64,
    pub duration: f64,
    pub volume: f32,
    /// Index of the current track within the queue, if it is queued.
    pub queue_index: Option<usize>,
    pub queue_len: usize,
}

pub struct PlaybackController<O: AudioOutput> {
    output: O,
    current: Option<Track>,
    queue: Vec<Track>,
    transport: TransportState,
    volume: f32,
    position: f64,
    duration: f64,
    restart_threshold: f64,
}

impl<O: AudioOutput> PlaybackController<O> {
    /// Take ownership of `output` and apply the session's starting volume.
    pub fn new(mut output: O, settings: &AudioSettings) -> Self {
        let volume = settings.initial_volume.clamp(0.0, 1.0);
        output.set_volume(volume);
        Self {
            output,
            current: None,
            queue: Vec::new(),
            transport: TransportState::Stopped,
            volume,
            position: 0.0,
            duration: 0.0,
            restart_threshold: settings.restart_threshold_secs,
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            track: self.current.clone(),
            transport: self.transport,
            position: self.position,
            duration: self.duration,
            volume: self.volume,
            queue_index: self.current_index(),
            queue_len: self.queue.len(),
        }
    }

    /// Expose the output signal to an analysis stage.
    pub fn signal_tap(&mut self) -> Result<SampleTap, TapError> {
        self.output.tap()
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.queue.iter().position(|t| t.id == current.id)
    }

    /// Play `track`, optionally establishing `context` as the new queue.
    ///
    /// Requesting the track that is already current toggles play/pause
    /// without reloading it.
    pub fn play(&mut self, track: Track, context: Option<Vec<Track>>) {
        if let Some(queue) = context {
            self.queue = queue;
        } else if self.queue.is_empty() {
            self.queue = vec![track.clone()];
        }

        if self.current.as_ref().is_some_and(|c| c.id == track.id) {
            self.toggle_play_pause();
            return;
        }

        self.position = 0.0;
        self.duration = track.duration.unwrap_or(0.0);
        let locator = track.audio_url.clone();
        debug!(id = %track.id, "loading track");
        self.current = Some(track);

        if let Err(e) = self.output.load(&locator) {
            warn!(error = %e, locator = %locator, "failed to load track");
            // Nothing is loaded any more, whatever the previous track was doing.
            self.transport = TransportState::Stopped;
            return;
        }
        self.resume();
    }

    /// Flip Playing <-> Paused on the loaded track. No-op when nothing is loaded.
    pub fn toggle_play_pause(&mut self) {
        if self.current.is_none() {
            return;
        }
        match self.transport {
            TransportState::Playing => {
                self.output.pause();
                self.transport = TransportState::Paused;
            }
            TransportState::Paused | TransportState::Stopped => self.resume(),
        }
    }

    fn resume(&mut self) {
        match self.output.play() {
            Ok(()) => self.transport = TransportState::Playing,
            Err(e) => warn!(error = %e, "playback request rejected"),
        }
    }

    /// Advance to the next queued track, or halt at the end of the queue.
    pub fn play_next(&mut self) {
        let next = self
            .current_index()
            .and_then(|i| self.queue.get(i + 1))
            .cloned();

        match next {
            Some(track) => self.play(track, None),
            None => {
                debug!("end of queue");
                self.output.pause();
                self.output.set_current_time(0.0);
                self.transport = TransportState::Stopped;
                self.position = 0.0;
            }
        }
    }

    /// Restart the current track when past the restart threshold, otherwise
    /// step back one entry in the queue.
    pub fn play_prev(&mut self) {
        if self.current.is_some() && self.output.current_time() > self.restart_threshold {
            self.output.set_current_time(0.0);
            self.position = 0.0;
            return;
        }

        let prev = self
            .current_index()
            .filter(|&i| i > 0)
            .and_then(|i| self.queue.get(i - 1))
            .cloned();
        if let Some(track) = prev {
            self.play(track, None);
        }
    }

    pub fn seek(&mut self, secs: f64) {
        let secs = secs.max(0.0);
        self.output.set_current_time(secs);
        self.position = secs;
    }

    /// Seek relative to the current position, staying within the known duration.
    pub fn seek_by(&mut self, delta: f64) {
        if self.current.is_none() {
            return;
        }
        let mut target = self.position + delta;
        if self.duration > 0.0 {
            target = target.min(self.duration);
        }
        self.seek(target);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.output.set_volume(self.volume);
    }

    /// Deliver every pending output notification to [`Self::handle_event`].
    pub fn pump_events(&mut self) {
        for event in self.output.drain_events() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: OutputEvent) {
        match event {
            OutputEvent::TimeUpdate { position } => self.position = position,
            OutputEvent::LoadedMetadata { duration } => {
                if let Some(d) = duration.or_else(|| self.output.duration()) {
                    self.duration = d;
                }
                if self.transport == TransportState::Playing {
                    if let Err(e) = self.output.play() {
                        warn!(error = %e, "resume after metadata failed");
                    }
                }
            }
            OutputEvent::Ended => self.play_next(),
            OutputEvent::Error { message } => {
                error!(%message, "audio output error");
                self.transport = TransportState::Stopped;
            }
        }
    }

    pub fn shutdown(&mut self, fade_out: Duration) {
        self.output.shutdown(fade_out);
        self.transport = TransportState::Stopped;
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &O {
        &self.output
    }

    #[cfg(test)]
    pub(crate) fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
