use tracing::{debug, warn};

use crate::audio::SampleTap;
use crate::config::VisualizerSettings;
use crate::error::TapError;

use super::analyser::FrequencyAnalyser;

enum GraphState {
    /// No connection attempted yet.
    Unwired,
    Connected {
        tap: SampleTap,
        analyser: FrequencyAnalyser,
        samples: Vec<f32>,
        /// Tap generation consumed by the previous frame.
        seen: Option<u64>,
    },
    /// The attempt failed; the renderer runs on the procedural fallback.
    Unavailable,
}

/// Optional link from the audio output into a frequency analyser.
///
/// Wiring is attempted once per session. Failure is logged and leaves the
/// graph permanently unavailable.
pub struct SignalGraph {
    state: GraphState,
    settings: VisualizerSettings,
}

impl SignalGraph {
    pub fn new(settings: &VisualizerSettings) -> Self {
        Self {
            state: GraphState::Unwired,
            settings: settings.clone(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, GraphState::Connected { .. })
    }

    pub fn is_attempted(&self) -> bool {
        !matches!(self.state, GraphState::Unwired)
    }

    /// Wire the graph using `connect`, unless a previous call already tried.
    pub fn connect_once(&mut self, connect: impl FnOnce() -> Result<SampleTap, TapError>) {
        if self.is_attempted() {
            return;
        }
        self.state = match connect() {
            Ok(tap) => {
                debug!(fft_size = self.settings.fft_size, "signal graph connected");
                GraphState::Connected {
                    tap,
                    analyser: FrequencyAnalyser::new(&self.settings),
                    samples: Vec::with_capacity(self.settings.fft_size),
                    seen: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "signal graph unavailable, using procedural spectrum");
                GraphState::Unavailable
            }
        };
    }

    /// Let a suspended tap start capturing. Called on user input.
    pub fn resume(&self) {
        if let GraphState::Connected { tap, .. } = &self.state {
            if !tap.is_running() {
                debug!("resuming signal tap");
                tap.resume();
            }
        }
    }

    /// Fill `out` with the latest normalised magnitudes; zeros when there is
    /// no usable signal. A tap that captured nothing since the previous call
    /// counts as no signal, so a stalled source does not freeze the bars.
    pub fn frequency_data(&mut self, out: &mut [f32]) {
        match &mut self.state {
            GraphState::Connected {
                tap,
                analyser,
                samples,
                seen,
            } if tap.is_running() => {
                let generation = tap.generation();
                if *seen == Some(generation) {
                    out.fill(0.0);
                    return;
                }
                *seen = Some(generation);
                tap.latest(analyser.fft_size(), samples);
                analyser.frequency_data(samples, out);
            }
            _ => out.fill(0.0),
        }
    }
}
