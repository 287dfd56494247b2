//! Playback core: the audio-output contract, its events, and the controller
//! that owns the single output, the queue and the transport state.

mod controller;
mod output;
mod transport;

pub use controller::{PlaybackController, PlayerSnapshot};
pub use output::{AudioOutput, OutputEvent};
pub use transport::TransportState;

#[cfg(test)]
mod tests;
