use std::path::PathBuf;

/// A playable track as the rest of the player sees it.
///
/// Only `audio_url` and `duration` matter to playback; everything else is
/// carried along for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Stable identifier: the file path relative to the scanned root.
    pub id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: Option<String>,
    pub album: Option<String>,
    /// Absolute location of the audio file.
    pub audio_url: String,
    pub cover_image_url: Option<PathBuf>,
    /// Stored duration in seconds, when the container reports one.
    pub duration: Option<f64>,
    pub likes: u32,
    /// Precomputed list label.
    pub display: String,
}

impl Track {
    /// The artist label shown in the player bar.
    pub fn artist_label(&self) -> &str {
        self.artist_name.as_deref().unwrap_or("Unknown artist")
    }
}

/// Build the artist identifier: a lowercase, dash-separated slug.
pub fn artist_slug(name: Option<&str>) -> String {
    let slug = name
        .unwrap_or_default()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "unknown-artist".to_string()
    } else {
        slug
    }
}
