use std::path::Path;

use crate::config::TrackDisplayField;

/// Build the list label for a track from the configured `fields`, joined by `sep`.
///
/// Falls back to `title` when no field produced any text.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let non_blank = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    let parts: Vec<String> = fields
        .iter()
        .filter_map(|f| match f {
            TrackDisplayField::Title => non_blank(title),
            TrackDisplayField::Artist => artist.and_then(non_blank),
            TrackDisplayField::Album => album.and_then(non_blank),
            TrackDisplayField::Filename => {
                path.file_stem().and_then(|s| s.to_str()).and_then(non_blank)
            }
        })
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
