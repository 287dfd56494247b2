use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by an audio output. None of them are fatal: the
/// controller logs them and leaves the transport in a retryable state.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("no audio source is loaded")]
    NoSource,

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("seek to {target:.2}s failed: {reason}")]
    Seek { target: f64, reason: String },
}

/// Failures while wiring the visualizer's signal tap into the output.
#[derive(Debug, Error)]
pub enum TapError {
    #[error("the audio output is already connected to an analysis graph")]
    AlreadyConnected,

    #[error("this audio output cannot expose its signal")]
    Unsupported,
}
