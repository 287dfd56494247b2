use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores an environment variable to its previous value on drop.
struct EnvVar {
    key: &'static str,
    old: Option<OsString>,
}

impl EnvVar {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe { std::env::set_var(key, val) };
        Self { key, old }
    }

    fn unset(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe { std::env::remove_var(key) };
        Self { key, old }
    }
}

impl Drop for EnvVar {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe { std::env::set_var(self.key, v) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_env_var() {
    let _lock = env_lock();
    let _g = EnvVar::set("TONEARM_CONFIG_PATH", "/tmp/tonearm-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/tonearm-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvVar::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvVar::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home/tonearm/config.toml")
    );
}

#[test]
fn default_log_path_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvVar::unset("XDG_STATE_HOME");
    let _g2 = EnvVar::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/state/tonearm/tonearm.log")
    );
}

#[test]
fn defaults_are_valid_and_match_the_player_bar() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.audio.initial_volume, 0.8);
    assert_eq!(s.audio.restart_threshold_secs, 3.0);
    assert_eq!(s.visualizer.fft_size, 32);
    assert_eq!(s.visualizer.gradient_bottom, "#6366f1");
    assert_eq!(s.visualizer.gradient_top, "#a855f7");
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r##"
[audio]
initial_volume = 0.5
restart_threshold_secs = 5.0
quit_fade_out_ms = 0

[visualizer]
fft_size = 64
width = 20
gradient_top = "#ffffff"

[controls]
scrub_seconds = 9

[ui]
follow_playback = false
header_text = "hello"

[library]
extensions = ["mp3"]
recursive = false
display_fields = ["filename"]
display_separator = "::"

[logging]
enabled = false
level = "tonearm=debug"
"##,
    )
    .unwrap();

    let _g1 = EnvVar::set("TONEARM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvVar::unset("TONEARM__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 0.5);
    assert_eq!(s.audio.restart_threshold_secs, 5.0);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.audio.volume_step, 0.05);
    assert_eq!(s.visualizer.fft_size, 64);
    assert_eq!(s.visualizer.width, 20);
    assert_eq!(s.visualizer.height, 3);
    assert_eq!(s.visualizer.gradient_top, "#ffffff");
    assert_eq!(s.controls.scrub_seconds, 9);
    assert!(!s.ui.follow_playback);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(matches!(s.library.display_fields[0], TrackDisplayField::Filename));
    assert_eq!(s.library.display_separator, "::");
    assert!(!s.logging.enabled);
    assert_eq!(s.logging.level, "tonearm=debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[controls]\nscrub_seconds = 10\n").unwrap();

    let _g1 = EnvVar::set("TONEARM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvVar::set("TONEARM__CONTROLS__SCRUB_SECONDS", "2");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 2);
}

#[test]
fn validate_rejects_unusable_visualizer_values() {
    let mut s = Settings::default();
    s.visualizer.fft_size = 48;
    assert!(s.validate().unwrap_err().contains("fft_size"));

    let mut s = Settings::default();
    s.visualizer.gradient_bottom = "indigo".into();
    assert!(s.validate().unwrap_err().contains("gradient_bottom"));

    let mut s = Settings::default();
    s.visualizer.min_db = -10.0;
    assert!(s.validate().unwrap_err().contains("min_db"));

    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().unwrap_err().contains("initial_volume"));
}
