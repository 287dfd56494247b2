use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::visualizer::Rgb;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `TONEARM__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TONEARM")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the player cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        let audio = &self.audio;
        if !(0.0..=1.0).contains(&audio.initial_volume) {
            return Err("audio.initial_volume must be within [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&audio.volume_step) {
            return Err("audio.volume_step must be within [0, 1]".to_string());
        }
        if audio.restart_threshold_secs < 0.0 {
            return Err("audio.restart_threshold_secs must be >= 0".to_string());
        }

        let vis = &self.visualizer;
        if !vis.fft_size.is_power_of_two() || !(4..=2048).contains(&vis.fft_size) {
            return Err("visualizer.fft_size must be a power of two in [4, 2048]".to_string());
        }
        if vis.frame_interval_ms == 0 {
            return Err("visualizer.frame_interval_ms must be >= 1".to_string());
        }
        if vis.width == 0 || vis.height == 0 {
            return Err("visualizer.width and visualizer.height must be >= 1".to_string());
        }
        if !(0.0..1.0).contains(&vis.smoothing) {
            return Err("visualizer.smoothing must be within [0, 1)".to_string());
        }
        if vis.min_db >= vis.max_db {
            return Err("visualizer.min_db must be lower than visualizer.max_db".to_string());
        }
        for (key, value) in [
            ("gradient_bottom", &vis.gradient_bottom),
            ("gradient_top", &vis.gradient_top),
        ] {
            if Rgb::from_hex(value).is_none() {
                return Err(format!("visualizer.{key} is not a #rrggbb colour: {value}"));
            }
        }
        Ok(())
    }
}

/// Resolve the config path from `TONEARM_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TONEARM_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tonearm/config.toml`
/// or `~/.config/tonearm/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("tonearm").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/tonearm/tonearm.log`
/// or `~/.local/state/tonearm/tonearm.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("tonearm").join("tonearm.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
