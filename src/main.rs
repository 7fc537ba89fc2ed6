mod cli;
mod error;
mod files;
mod loader;
mod ui;

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use winit::event_loop::EventLoop;

use crate::cli::{usage, Cli};
use crate::error::ViewerError;
use crate::files::classify;
use crate::loader::Resources;
use crate::ui::state::ViewerState;
use crate::ui::App;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let Some(path) = cli.path else {
        let program = std::env::args().next().unwrap_or_else(|| "liv".to_string());
        print!("{}", usage(&program));
        return ExitCode::from(1);
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(path: &Path) -> Result<(), ViewerError> {
    let kind = classify(path);
    log::info!("{:?} classified as {:?}", path, kind);

    // Invalid paths and decode failures stop here, before any window exists.
    let resources = Resources::open(path, kind)?;

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            resources.close();
            return Err(e.into());
        }
    };

    let mut app = App::new(ViewerState::new(), resources);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
