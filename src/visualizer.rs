//! Spectrum visualizer for the player bar.
//!
//! `SpectrumRenderer` runs a self-rescheduling frame loop while the transport
//! is playing. Each frame reads the signal graph (real frequency data) or, if
//! that yields nothing, synthesises bars procedurally.

mod analyser;
mod canvas;
mod frames;
mod graph;
mod procedural;
mod renderer;
mod surface;

pub use canvas::CellCanvas;
pub use frames::{FrameClock, FrameId, FrameScheduler};
pub use renderer::{SpectrumRenderer, SpectrumSource};
pub use surface::{BarRect, Gradient, Rgb, Surface};
