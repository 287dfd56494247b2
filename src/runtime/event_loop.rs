use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::player::{AudioOutput, PlaybackController};
use crate::ui;
use crate::visualizer::{CellCanvas, FrameClock, SpectrumRenderer};

/// Longest the loop sleeps waiting for input when no frame is due.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Everything the loop drives, borrowed from the composition root.
pub struct Parts<'a, O: AudioOutput> {
    pub app: &'a mut App,
    pub controller: &'a mut PlaybackController<O>,
    pub renderer: &'a mut SpectrumRenderer,
    pub clock: &'a mut FrameClock,
    pub canvas: &'a mut CellCanvas,
}

/// State tracked by the event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Id of the now-playing track the cursor last followed.
    pub followed_id: Option<String>,
}

/// Main terminal event loop. Returns `Ok(())` when the user quits.
pub fn run<O: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    parts: &mut Parts<'_, O>,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let mut state = EventLoopState::default();

    loop {
        parts.controller.pump_events();
        follow_now_playing(parts, &mut state);

        let now = Instant::now();
        let elapsed = now.duration_since(started);
        parts.renderer.set_playing(
            parts.controller.is_playing(),
            elapsed,
            &mut *parts.canvas,
            &mut *parts.clock,
        );
        if let Some(id) = parts.clock.take_due(now) {
            parts
                .renderer
                .on_frame(id, elapsed, &mut *parts.canvas, &mut *parts.clock);
        }

        let snapshot = parts.controller.snapshot();
        terminal.draw(|f| ui::draw(f, &*parts.app, &snapshot, &*parts.canvas, settings))?;

        let timeout = parts
            .clock
            .time_until_due(Instant::now())
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, parts, &mut state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Move the cursor onto a newly started track when following playback.
fn follow_now_playing<O: AudioOutput>(parts: &mut Parts<'_, O>, state: &mut EventLoopState) {
    let current = parts.controller.current_track().map(|t| t.id.clone());
    if current == state.followed_id {
        return;
    }
    if let Some(id) = &current {
        if parts.app.follow_playback && !parts.app.filter_mode {
            parts.app.select_track_id(id);
        }
    }
    state.followed_id = current;
}

/// Play the selected track. With `with_context` the visible list becomes the queue.
fn play_selected<O: AudioOutput>(parts: &mut Parts<'_, O>, with_context: bool) {
    let Some(track) = parts.app.selected_track().cloned() else {
        return;
    };
    // Wire the analyser before the first load so the source gets tapped.
    let controller = &mut *parts.controller;
    parts.renderer.ensure_signal_graph(|| controller.signal_tap());
    // The key press that wired the graph is itself a user gesture.
    parts.renderer.on_user_gesture();

    let context = with_context.then(|| parts.app.visible_tracks());
    debug!(id = %track.id, queued = context.as_ref().map(Vec::len), "play selected");
    parts.app.follow_playback = true;
    parts.controller.play(track, context);
}

/// Handle one key press. Returns `true` when the app should quit.
pub(crate) fn handle_key_event<O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    parts: &mut Parts<'_, O>,
    state: &mut EventLoopState,
) -> bool {
    // Any key counts as the user gesture that lets the tap run.
    parts.renderer.on_user_gesture();

    let app = &mut *parts.app;
    if app.filter_mode {
        state.pending_gg = false;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('j' | 'n') if ctrl => {
                app.follow_playback = false;
                app.next();
            }
            KeyCode::Char('k' | 'p') if ctrl => {
                app.follow_playback = false;
                app.prev();
            }
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            KeyCode::Enter => {
                if !app.display_indices().is_empty() {
                    app.exit_filter_mode();
                    play_selected(parts, true);
                }
            }
            _ => {}
        }
        return false;
    }

    let scrub = settings.controls.scrub_seconds as f64;
    let step = settings.audio.volume_step;

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback = false;
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback = false;
            app.prev();
        }
        KeyCode::Enter => play_selected(parts, true),
        KeyCode::Char('o') => play_selected(parts, false),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            if parts.controller.current_track().is_some() {
                parts.controller.toggle_play_pause();
            } else {
                play_selected(parts, true);
            }
        }
        KeyCode::Char('l') => parts.controller.play_next(),
        KeyCode::Char('h') => parts.controller.play_prev(),
        KeyCode::Char('L') => parts.controller.seek_by(scrub),
        KeyCode::Char('H') => parts.controller.seek_by(-scrub),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let volume = parts.controller.volume() + step;
            parts.controller.set_volume(volume);
        }
        KeyCode::Char('-') => {
            let volume = parts.controller.volume() - step;
            parts.controller.set_volume(volume);
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}
