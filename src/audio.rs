//! `rodio` realisation of the audio output, plus the sample tap the
//! visualizer reads from.

mod output;
mod sink;
mod tap;

pub use output::RodioOutput;
pub use tap::SampleTap;
