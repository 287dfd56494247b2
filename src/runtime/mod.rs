use std::env;
use std::path::Path;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::App;
use crate::audio::RodioOutput;
use crate::library::scan;
use crate::logging::init_tracing;
use crate::player::PlaybackController;
use crate::visualizer::{CellCanvas, FrameClock, SpectrumRenderer};

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Some(path) = init_tracing(&settings.logging) {
        info!(log = %path.display(), "tonearm starting");
    }

    let dir = env::args().nth(1).unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let tracks = scan(Path::new(&dir), &settings.library);
    info!(count = tracks.len(), dir = %dir, "library loaded");

    let output = RodioOutput::open_default().inspect_err(|e| {
        error!(error = %e, "failed to open audio output");
    })?;
    let mut controller = PlaybackController::new(output, &settings.audio);

    let viz = &settings.visualizer;
    let mut renderer = SpectrumRenderer::new(viz);
    let mut clock = FrameClock::new(Duration::from_millis(viz.frame_interval_ms));
    let mut canvas = CellCanvas::new(viz.width, viz.height);

    let mut app = App::new(tracks);
    app.follow_playback = settings.ui.follow_playback;
    app.set_current_dir(dir);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut parts = event_loop::Parts {
        app: &mut app,
        controller: &mut controller,
        renderer: &mut renderer,
        clock: &mut clock,
        canvas: &mut canvas,
    };
    let run_result = event_loop::run(&mut terminal, &settings, &mut parts);

    renderer.unmount(&mut clock);
    controller.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("tonearm stopped");
    run_result
}
