use crate::config;

/// Load settings, falling back to defaults. Config is optional and never fatal.
///
/// Runs before logging is up, so problems go to stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => s,
            Err(msg) => {
                eprintln!("tonearm: invalid config, using defaults: {msg}");
                config::Settings::default()
            }
        },
        Err(e) => {
            eprintln!("tonearm: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
