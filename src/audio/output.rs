use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink, StreamError};
use tracing::{debug, warn};

use crate::error::{OutputError, TapError};
use crate::player::{AudioOutput, OutputEvent};

use super::sink::{create_sink_at, locator_path};
use super::tap::SampleTap;

/// Samples of history kept for the analyser.
const TAP_CAPACITY: usize = 4096;
const FADE_STEPS: u64 = 20;

/// How to move the playhead of the installed sink.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Reposition {
    /// Seek the queued source in place.
    InPlace,
    /// Decode the file again from the target position.
    Rebuild,
}

/// A drained sink holds no source to seek or resume, so it must be rebuilt
/// from the remembered path.
pub(super) fn reposition(drained: bool, has_path: bool) -> Reposition {
    if drained && has_path {
        Reposition::Rebuild
    } else {
        Reposition::InPlace
    }
}

/// The session's one audio channel, backed by a `rodio` sink on the default
/// output device.
pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    /// Position the current sink started at (non-zero after a rebuild-seek).
    offset: Duration,
    volume: f32,
    duration: Option<f64>,
    tap: Option<SampleTap>,
    events: Vec<OutputEvent>,
    ended_reported: bool,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, StreamError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            path: None,
            offset: Duration::ZERO,
            volume: 1.0,
            duration: None,
            tap: None,
            events: Vec::new(),
            ended_reported: false,
        })
    }

    fn install(&mut self, sink: Sink, offset: Duration) {
        sink.set_volume(self.volume);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.offset = offset;
        self.ended_reported = false;
    }

    /// Seek by rebuilding the sink with the decoder skipped to `target`.
    fn rebuild_at(&mut self, target: Duration) -> Result<(), OutputError> {
        let Some(path) = self.path.clone() else {
            return Err(OutputError::NoSource);
        };
        let was_paused = self.sink.as_ref().is_none_or(Sink::is_paused);
        let (sink, _) = create_sink_at(self.stream.mixer(), &path, target, self.tap.as_ref())?;
        if !was_paused {
            sink.play();
        }
        self.install(sink, target);
        Ok(())
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, locator: &str) -> Result<(), OutputError> {
        let path = locator_path(locator);
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.path = None;
        self.duration = None;
        if let Some(tap) = &self.tap {
            tap.clear();
        }

        match create_sink_at(self.stream.mixer(), &path, Duration::ZERO, self.tap.as_ref()) {
            Ok((sink, total)) => {
                self.install(sink, Duration::ZERO);
                self.path = Some(path);
                self.duration = total.map(|d| d.as_secs_f64());
                self.events.push(OutputEvent::LoadedMetadata {
                    duration: self.duration,
                });
                Ok(())
            }
            Err(e) => {
                self.events.push(OutputEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn play(&mut self) -> Result<(), OutputError> {
        let drained = self.sink.as_ref().ok_or(OutputError::NoSource)?.empty();
        // A sink that played to the end has nothing left; replay from the top.
        if reposition(drained, self.path.is_some()) == Reposition::Rebuild {
            self.rebuild_at(Duration::ZERO)?;
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn current_time(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.offset + s.get_pos())
            .as_secs_f64()
    }

    fn set_current_time(&mut self, secs: f64) {
        let Some(sink) = &self.sink else {
            return;
        };
        let target = Duration::from_secs_f64(secs.max(0.0));
        // rodio reports success without moving anything once the sink is drained.
        if reposition(sink.empty(), self.path.is_some()) == Reposition::Rebuild {
            if let Err(e) = self.rebuild_at(target) {
                warn!(error = %e, target = secs, "rebuilding drained sink failed");
            }
            return;
        }
        match sink.try_seek(target) {
            Ok(()) => {
                self.offset = Duration::ZERO;
                self.ended_reported = false;
            }
            Err(e) => {
                debug!(error = %e, "decoder cannot seek, rebuilding sink");
                if let Err(rebuild) = self.rebuild_at(target) {
                    let err = OutputError::Seek {
                        target: secs,
                        reason: format!("{e}; rebuild: {rebuild}"),
                    };
                    warn!(error = %err, "seek failed");
                }
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn drain_events(&mut self) -> Vec<OutputEvent> {
        if let Some(sink) = &self.sink {
            if !sink.is_paused() {
                if sink.empty() {
                    if !self.ended_reported {
                        self.ended_reported = true;
                        self.events.push(OutputEvent::Ended);
                    }
                } else {
                    self.events.push(OutputEvent::TimeUpdate {
                        position: self.current_time(),
                    });
                }
            }
        }
        std::mem::take(&mut self.events)
    }

    fn tap(&mut self) -> Result<SampleTap, TapError> {
        if self.tap.is_some() {
            return Err(TapError::AlreadyConnected);
        }
        let tap = SampleTap::new(TAP_CAPACITY);
        self.tap = Some(tap.clone());
        Ok(tap)
    }

    fn shutdown(&mut self, fade_out: Duration) {
        let Some(sink) = self.sink.take() else {
            return;
        };
        if !sink.is_paused() && !fade_out.is_zero() {
            let step = (fade_out / FADE_STEPS as u32).max(Duration::from_millis(1));
            for i in 1..=FADE_STEPS {
                let t = i as f32 / FADE_STEPS as f32;
                sink.set_volume(self.volume * (1.0 - t));
                thread::sleep(step);
            }
        }
        sink.stop();
    }
}
