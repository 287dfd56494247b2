use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::{Track, artist_slug};

const COVER_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn cover_next_to(path: &Path) -> Option<PathBuf> {
    let dir = path.parent()?;
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn non_blank(v: impl AsRef<str>) -> Option<String> {
    let v = v.as_ref().trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Build a `Track` for one audio file below `root`.
fn read_track(root: &Path, path: &Path, settings: &LibrarySettings) -> Track {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut duration: Option<f64> = None;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let secs = tagged.properties().duration().as_secs_f64();
            duration = (secs > 0.0).then_some(secs);

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().and_then(non_blank) {
                    title = v;
                }
                artist = tag.artist().and_then(non_blank);
                album = tag.album().and_then(non_blank);
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    let id = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();
    let display = display_from_fields(
        path,
        &title,
        artist.as_deref(),
        album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    Track {
        id,
        artist_id: artist_slug(artist.as_deref()),
        title,
        artist_name: artist,
        album,
        audio_url: path.to_string_lossy().into_owned(),
        cover_image_url: cover_next_to(path),
        duration,
        likes: 0,
        display,
    }
}

/// Walk `dir` and return every audio file as a `Track`, sorted by label.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .map(|e| read_track(dir, e.path(), settings))
        .collect();

    tracks.sort_by_key(|t| t.display.to_lowercase());
    debug!(count = tracks.len(), root = %dir.display(), "library scanned");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackDisplayField;
    use std::fs;
    use tempfile::tempdir;

    fn by_filename() -> LibrarySettings {
        LibrarySettings {
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        }
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_builds_relative_ids_and_sorts_by_label() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("album");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &by_filename());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].display, "A");
        assert_eq!(tracks[0].id, "A.ogg");
        assert_eq!(tracks[1].display, "b");
        assert_eq!(
            PathBuf::from(&tracks[1].id),
            PathBuf::from("album").join("b.MP3")
        );
        assert!(tracks[1].audio_url.ends_with("b.MP3"));
        assert_eq!(tracks[1].artist_id, "unknown-artist");
        assert_eq!(tracks[1].duration, None);
    }

    #[test]
    fn scan_picks_up_folder_cover_art() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("cover.png"), b"png").unwrap();

        let tracks = scan(dir.path(), &by_filename());
        assert_eq!(tracks[0].cover_image_url, Some(dir.path().join("cover.png")));
    }

    #[test]
    fn scan_skips_hidden_files_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let tracks = scan(dir.path(), &by_filename());
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..by_filename()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "root");
    }
}
