//! The spectrum's render loop.
//!
//! Idle until the transport reports playing, then one frame per scheduler
//! callback, each frame requesting the next. Dropping out of playing cancels
//! the outstanding request and clears the surface.

use std::time::Duration;

use tracing::trace;

use crate::audio::SampleTap;
use crate::config::VisualizerSettings;
use crate::error::TapError;

use super::frames::{FrameId, FrameScheduler};
use super::graph::SignalGraph;
use super::procedural;
use super::surface::{BarRect, Gradient, Rgb, Surface};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Rendering { pending: Option<FrameId> },
}

/// Where the last frame's bar heights came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpectrumSource {
    Signal,
    Procedural,
}

pub struct SpectrumRenderer {
    phase: Phase,
    graph: SignalGraph,
    gradient: Gradient,
    bar_gap: f32,
    corner_radius: f32,
    bins: Vec<f32>,
    heights: Vec<f32>,
    source: SpectrumSource,
}

impl SpectrumRenderer {
    pub fn new(settings: &VisualizerSettings) -> Self {
        let bottom = Rgb::from_hex(&settings.gradient_bottom).unwrap_or(Rgb(0x63, 0x66, 0xf1));
        let top = Rgb::from_hex(&settings.gradient_top).unwrap_or(Rgb(0xa8, 0x55, 0xf7));
        let bin_count = (settings.fft_size / 2).max(1);

        Self {
            phase: Phase::Idle,
            graph: SignalGraph::new(settings),
            gradient: Gradient { bottom, top },
            bar_gap: settings.bar_gap.max(0.0),
            corner_radius: settings.corner_radius.max(0.0),
            bins: vec![0.0; bin_count],
            heights: vec![0.0; bin_count],
            source: SpectrumSource::Procedural,
        }
    }

    pub fn is_rendering(&self) -> bool {
        matches!(self.phase, Phase::Rendering { .. })
    }

    /// Bar heights of the most recent frame, in surface units.
    pub fn bar_heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn last_source(&self) -> SpectrumSource {
        self.source
    }

    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    /// Wire the signal graph on the first play attempt; later calls do nothing.
    pub fn ensure_signal_graph(&mut self, connect: impl FnOnce() -> Result<SampleTap, TapError>) {
        self.graph.connect_once(connect);
    }

    /// Forward a user gesture so a suspended signal tap may start.
    pub fn on_user_gesture(&self) {
        self.graph.resume();
    }

    /// Follow the transport's playing flag. Only edges change anything.
    pub fn set_playing<S, F>(&mut self, playing: bool, now: Duration, surface: &mut S, frames: &mut F)
    where
        S: Surface,
        F: FrameScheduler,
    {
        match (self.phase, playing) {
            (Phase::Idle, true) => {
                trace!("spectrum rendering");
                self.phase = Phase::Rendering { pending: None };
                self.frame(now, surface, frames);
            }
            (Phase::Rendering { pending }, false) => {
                trace!("spectrum idle");
                if let Some(id) = pending {
                    frames.cancel_frame(id);
                }
                self.phase = Phase::Idle;
                self.heights.fill(0.0);
                surface.clear();
            }
            _ => {}
        }
    }

    /// Scheduler callback for request `id`.
    pub fn on_frame<S, F>(&mut self, id: FrameId, now: Duration, surface: &mut S, frames: &mut F)
    where
        S: Surface,
        F: FrameScheduler,
    {
        match self.phase {
            Phase::Rendering { pending } if pending == Some(id) => self.frame(now, surface, frames),
            Phase::Rendering { .. } => {}
            Phase::Idle => surface.clear(),
        }
    }

    /// Stop for good: cancel whatever is scheduled.
    pub fn unmount<F: FrameScheduler>(&mut self, frames: &mut F) {
        if let Phase::Rendering { pending: Some(id) } = self.phase {
            frames.cancel_frame(id);
        }
        self.phase = Phase::Idle;
    }

    fn frame<S, F>(&mut self, now: Duration, surface: &mut S, frames: &mut F)
    where
        S: Surface,
        F: FrameScheduler,
    {
        self.phase = Phase::Rendering {
            pending: Some(frames.request_frame()),
        };

        let (width, height) = surface.size();
        self.graph.frequency_data(&mut self.bins);

        if self.bins.iter().all(|&b| b == 0.0) {
            // Silent, blocked or unwired signal.
            self.source = SpectrumSource::Procedural;
            let time_ms = now.as_secs_f64() * 1000.0;
            for (i, h) in self.heights.iter_mut().enumerate() {
                *h = procedural::bar_height(i, time_ms, height, rand::random::<f32>());
            }
        } else {
            self.source = SpectrumSource::Signal;
            for (h, &b) in self.heights.iter_mut().zip(&self.bins) {
                *h = b * height;
            }
        }

        surface.clear();
        let slot = width / self.heights.len() as f32;
        let bar_width = (slot - self.bar_gap).max(slot.min(1.0));
        for (i, &h) in self.heights.iter().enumerate() {
            if h <= 0.0 {
                continue;
            }
            let rect = BarRect {
                x: i as f32 * slot,
                y: height - h,
                width: bar_width,
                height: h,
            };
            surface.fill_rounded_rect(rect, self.corner_radius, &self.gradient);
        }
    }
}
