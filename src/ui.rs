//! UI rendering for the terminal interface.
//!
//! Everything here is a pure function of the browsing model, a playback
//! snapshot and the visualizer canvas; nothing in this module mutates state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, fuzzy_match};
use crate::config::Settings;
use crate::library::Track;
use crate::player::{PlayerSnapshot, TransportState};
use crate::profile::SonicProfile;
use crate::visualizer::CellCanvas;

/// Shown as the total when neither the output nor the track knows the length.
const FALLBACK_TOTAL_SECS: f64 = 180.0;

const CONTROLS: [(&str, &str); 11] = [
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play"),
    ("o", "play single"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", "scrub"),
    ("+/-", "volume"),
    ("/", "filter"),
    ("K", "metadata"),
    ("q", "quit"),
];

fn controls_text(scrub_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(key, action)| {
            if *key == "H/L" {
                format!("[{key}] {action} -/+{scrub_seconds}s")
            } else {
                format!("[{key}] {action}")
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Format seconds as `m:ss`. Negative and non-finite values read as zero.
fn format_clock(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Total length to display: the output's duration, else the track's, else a fallback.
fn display_total(snapshot: &PlayerSnapshot) -> f64 {
    if snapshot.duration > 0.0 {
        return snapshot.duration;
    }
    snapshot
        .track
        .as_ref()
        .and_then(|t| t.duration)
        .filter(|d| *d > 0.0)
        .unwrap_or(FALLBACK_TOTAL_SECS)
}

fn progress_ratio(position: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (position / total).clamp(0.0, 1.0)
}

fn transport_glyph(state: TransportState) -> &'static str {
    match state {
        TransportState::Playing => "▶",
        TransportState::Paused => "⏸",
        TransportState::Stopped => "■",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Uppercase the characters of `text` that the filter matched.
fn highlight_matches(text: &str, query: &str) -> String {
    let Some(positions) = fuzzy_match(text, query) else {
        return text.to_string();
    };
    let mut positions = positions.into_iter().peekable();
    let mut rendered = String::with_capacity(text.len());
    for (ci, ch) in text.chars().enumerate() {
        if positions.peek() == Some(&ci) {
            positions.next();
            rendered.extend(ch.to_uppercase());
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

fn metadata_text(track: &Track) -> String {
    let profile = SonicProfile::for_track_id(&track.id);
    let duration = track
        .duration
        .map(format_clock)
        .unwrap_or_else(|| "-".to_string());
    let cover = track
        .cover_image_url
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nCover: {}\nPath: {}\n\
         BPM: {} • Energy: {}% • Danceability: {}% • Key: {}",
        track.title,
        track.artist_label(),
        track.album.as_deref().unwrap_or("-"),
        duration,
        cover,
        track.audio_url,
        profile.bpm,
        profile.energy,
        profile.danceability,
        profile.key,
    )
}

fn draw_now_playing(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    player: &PlayerSnapshot,
    canvas: &CellCanvas,
) {
    let block = left_padded(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [info_area, viz_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(canvas.cols() + 1)])
        .areas(inner);

    let [title_area, status_area, gauge_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(info_area);

    let title = match &player.track {
        Some(track) => format!(
            "{} {} - {}",
            transport_glyph(player.transport),
            track.title,
            track.artist_label()
        ),
        None => format!("{} nothing playing", transport_glyph(player.transport)),
    };
    frame.render_widget(
        Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
        title_area,
    );

    let mut status = vec![
        player.transport.label().to_string(),
        format!("Vol: {:.0}%", player.volume * 100.0),
    ];
    if let Some(i) = player.queue_index {
        status.push(format!("Queue: {}/{}", i + 1, player.queue_len));
    }
    status.push(if app.follow_playback {
        "Cursor: Follow".to_string()
    } else {
        "Cursor: Free-roam".to_string()
    });
    let query = app.filter_query.trim();
    if app.filter_mode || !query.is_empty() {
        status.push(format!("Filter: {query}"));
    }
    if let Some(dir) = &app.current_dir {
        status.push(format!("Dir: {dir}"));
    }
    frame.render_widget(Paragraph::new(status.join(" • ")), status_area);

    let total = display_total(player);
    let label = format!(
        "{} / {}",
        format_clock(player.position),
        format_clock(total)
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(progress_ratio(player.position, total))
        .label(label);
    frame.render_widget(gauge, gauge_area);

    frame.render_widget(canvas, viz_area);
}

fn draw_tracks(frame: &mut Frame, area: Rect, app: &App, display: &[usize]) {
    let query = app.filter_query.trim();

    // Only build items for the visible window, centred on the selection.
    let total = display.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let start = sel_pos.saturating_sub(half).min(total - list_height);
        (start, start + list_height)
    };

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let text = &app.tracks[i].display;
            if query.is_empty() {
                ListItem::new(text.as_str())
            } else {
                ListItem::new(highlight_matches(text, query))
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the entire UI.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    player: &PlayerSnapshot,
    canvas: &CellCanvas,
    settings: &Settings,
) {
    let now_playing_height = canvas.rows().max(3) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(now_playing_height),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tonearm ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, chunks[1], app, player, canvas);

    let display = app.display_indices();
    draw_tracks(frame, chunks[2], app, &display);

    if app.metadata_window {
        let popup_area = centered_rect_sized(76, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let text = app
            .selected_track()
            .map(metadata_text)
            .unwrap_or_else(|| "No track selected".to_string());
        let popup = Paragraph::new(text)
            .block(left_padded(" metadata (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }

    let footer = Paragraph::new(Line::from(controls_text(settings.controls.scrub_seconds)))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
