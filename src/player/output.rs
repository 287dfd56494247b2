use std::time::Duration;

use crate::audio::SampleTap;
use crate::error::{OutputError, TapError};

/// Notifications an output delivers to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// The playback clock moved.
    TimeUpdate { position: f64 },
    /// The loaded resource reported its metadata. `duration` is `None` when
    /// the container does not know its length.
    LoadedMetadata { duration: Option<f64> },
    /// The loaded resource played to its natural end.
    Ended,
    /// The resource could not be loaded or played.
    Error { message: String },
}

/// One playable media channel.
///
/// Implementations queue their events internally; the owner drains them with
/// [`AudioOutput::drain_events`] and feeds them back one at a time.
pub trait AudioOutput {
    /// Point the output at `locator` and prepare it, paused at position 0.
    ///
    /// On failure the previous resource is gone as well; the output may also
    /// queue an `Error` event, but callers must not rely on it.
    fn load(&mut self, locator: &str) -> Result<(), OutputError>;

    /// Start or resume playback of the loaded resource.
    fn play(&mut self) -> Result<(), OutputError>;

    fn pause(&mut self);

    /// Elapsed seconds on the output's own clock.
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, secs: f64);

    /// Volume in `[0, 1]`; kept across `load` calls.
    fn set_volume(&mut self, volume: f32);

    /// Authoritative length of the loaded resource, if known.
    fn duration(&self) -> Option<f64>;

    /// Take every event queued since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<OutputEvent>;

    /// Hand out a read-only view of the output signal. At most one tap may
    /// exist per output.
    fn tap(&mut self) -> Result<SampleTap, TapError> {
        Err(TapError::Unsupported)
    }

    /// Silence the output before the process exits.
    fn shutdown(&mut self, _fade_out: Duration) {
        self.pause();
    }
}
