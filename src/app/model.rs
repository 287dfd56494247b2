//! Browsing model: the library list, the cursor and the fuzzy filter.
//!
//! Playback state is not kept here; the runtime owns the controller and the
//! UI reads it through a `PlayerSnapshot`.

use crate::library::Track;

pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,

    /// Cursor jumps to the now-playing track when it changes.
    pub follow_playback: bool,

    pub filter_mode: bool,
    pub filter_query: String,
    pub current_dir: Option<String>,
    pub metadata_window: bool,
}

impl App {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            follow_playback: true,
            filter_mode: false,
            filter_query: String::new(),
            current_dir: None,
            metadata_window: false,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Library indices currently visible, in list order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        (0..self.tracks.len())
            .filter(|&i| query.is_empty() || fuzzy_match(&self.tracks[i].display, query).is_some())
            .collect()
    }

    /// The visible tracks, used as the queue when playing from the list.
    pub fn visible_tracks(&self) -> Vec<Track> {
        self.display_indices()
            .into_iter()
            .map(|i| self.tracks[i].clone())
            .collect()
    }

    /// Move the cursor onto the track with `id`, if it is visible.
    pub fn select_track_id(&mut self, id: &str) {
        if let Some(i) = self.display_indices().into_iter().find(|&i| self.tracks[i].id == id) {
            self.selected = i;
        }
    }

    /// Move to the next visible track, wrapping at the end.
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Move to the previous visible track, wrapping at the start.
    pub fn prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: isize) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        let len = display.len() as isize;
        let next = match display.iter().position(|&i| i == self.selected) {
            Some(p) => (p as isize + delta).rem_euclid(len),
            None => 0,
        };
        self.selected = display[next as usize];
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.follow_playback = false;
        self.ensure_selected_visible();
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if !display.contains(&self.selected) {
            self.selected = display.first().copied().unwrap_or(0);
        }
    }
}

/// Subsequence match, case-insensitive. Returns the matched char positions
/// in `text`, or `None` when `query` does not appear in order.
pub fn fuzzy_match(text: &str, query: &str) -> Option<Vec<usize>> {
    let mut positions = Vec::new();
    let mut chars = text.chars().enumerate();

    for qc in query.chars() {
        let (pos, _) = chars.find(|(_, tc)| tc.to_lowercase().eq(qc.to_lowercase()))?;
        positions.push(pos);
    }
    Some(positions)
}
