//! Utilities for creating `rodio` sinks from audio locators.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use crate::error::OutputError;

use super::tap::{SampleTap, TapSource};

/// Turn a track locator into a filesystem path. Accepts bare paths and
/// `file://` URLs.
pub(super) fn locator_path(locator: &str) -> PathBuf {
    PathBuf::from(locator.strip_prefix("file://").unwrap_or(locator))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Returns the sink together with the decoder's total duration, if known.
pub(super) fn create_sink_at(
    mixer: &Mixer,
    path: &Path,
    start_at: Duration,
    tap: Option<&SampleTap>,
) -> Result<(Sink, Option<Duration>), OutputError> {
    let file = File::open(path).map_err(|source| OutputError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| OutputError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    // `skip_duration` is the fallback seeking primitive; even Duration::ZERO is fine.
    let source = TapSource::new(decoder.skip_duration(start_at), tap.cloned());

    let sink = Sink::connect_new(mixer);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
