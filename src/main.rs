mod app;
mod audio;
mod config;
mod error;
mod library;
mod logging;
mod player;
mod profile;
mod runtime;
mod ui;
mod visualizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
