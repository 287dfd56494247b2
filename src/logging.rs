//! Log file setup. The terminal belongs to the TUI, so logs only go to a file.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_log_path};

/// Resolve where the log file should live.
fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.path.clone().or_else(default_log_path)
}

/// Install the global subscriber. Returns the log file path when logging is on.
///
/// Failures are reported on stderr (the TUI is not up yet) and leave logging off.
pub fn init_tracing(settings: &LoggingSettings) -> Option<PathBuf> {
    if !settings.enabled {
        return None;
    }

    let Some(path) = log_path(settings) else {
        eprintln!("tonearm: no HOME or XDG_STATE_HOME set, logging disabled");
        return None;
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!(
                "tonearm: failed to create log directory {}: {e}",
                parent.display()
            );
            return None;
        }
    }

    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("tonearm: failed to create log file at {}: {e}", path.display());
            return None;
        }
    };

    let env_filter = EnvFilter::try_from_env("TONEARM_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    Some(path)
}
