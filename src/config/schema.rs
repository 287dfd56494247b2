use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tonearm/config.toml` or `~/.config/tonearm/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TONEARM__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub visualizer: VisualizerSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume applied to the output when the session starts, in `[0, 1]`.
    pub initial_volume: f32,
    /// Amount added/removed by the `+` / `-` keys.
    pub volume_step: f32,
    /// Past this many elapsed seconds, "previous" restarts the current track.
    pub restart_threshold_secs: f64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.8,
            volume_step: 0.05,
            restart_threshold_secs: 3.0,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Transform size of the frequency analyser. Bars drawn = `fft_size / 2`.
    pub fft_size: usize,
    /// Canvas width in terminal cells.
    pub width: u16,
    /// Canvas height in terminal cells.
    pub height: u16,
    /// Delay between two scheduled frames (milliseconds).
    pub frame_interval_ms: u64,
    /// Horizontal gap between bars, in cells.
    pub bar_gap: f32,
    /// Corner radius of the bar tops, in cells. 0 draws square bars.
    pub corner_radius: f32,
    /// Gradient colour at the bottom of every bar (`#rrggbb`).
    pub gradient_bottom: String,
    /// Gradient colour at the top of every bar (`#rrggbb`).
    pub gradient_top: String,
    /// Exponential smoothing between analyser frames, in `[0, 1)`.
    pub smoothing: f32,
    /// Magnitude mapped to an empty bar.
    pub min_db: f32,
    /// Magnitude mapped to a full bar.
    pub max_db: f32,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            fft_size: 32,
            width: 48,
            height: 3,
            frame_interval_ms: 33,
            bar_gap: 1.0,
            corner_radius: 1.0,
            gradient_bottom: "#6366f1".to_string(),
            gradient_top: "#a855f7".to_string(),
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the cursor follows the now-playing track.
    pub follow_playback: bool,

    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            follow_playback: true,
            header_text: " ~ drop the needle ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Filename,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Which fields to use to build `Track.display` and its ordering.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            display_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Write a log file at all.
    pub enabled: bool,
    /// Filter directive used when `TONEARM_LOG` is unset (e.g. "info", "tonearm=debug").
    pub level: String,
    /// Explicit log file location. Defaults to the XDG state directory.
    pub path: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            path: None,
        }
    }
}
