use super::display::display_from_fields;
use super::model::artist_slug;
use crate::config::TrackDisplayField;
use std::path::Path;

#[test]
fn display_from_fields_can_format_artist_title() {
    let p = Path::new("/tmp/Song.mp3");
    let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(
        display_from_fields(p, "Song", Some("  Artist  "), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(p, "Song", None, None, &fields, " - "),
        "Song"
    );
}

#[test]
fn display_from_fields_falls_back_to_title() {
    let p = Path::new("/tmp/Song.mp3");
    assert_eq!(
        display_from_fields(p, "Song", None, None, &[TrackDisplayField::Album], " - "),
        "Song"
    );
}

#[test]
fn artist_slug_is_lowercase_and_dashed() {
    assert_eq!(artist_slug(Some("Daft Punk")), "daft-punk");
    assert_eq!(artist_slug(Some("  AC/DC ")), "ac-dc");
    assert_eq!(artist_slug(Some("   ")), "unknown-artist");
    assert_eq!(artist_slug(None), "unknown-artist");
}
