//! Doge Party
//!
//! Loads settings, opens the window and runs the scene loop until the last
//! round is played or the player quits.

mod app;
mod input;

use anyhow::{Context, Result};
use doge_render::window::create_event_loop;
use doge_services::Settings;
use winit::event_loop::ControlFlow;

use crate::app::App;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Doge Party v{}", doge_core::VERSION);
    let settings = Settings::load_default_location().context("failed to load settings")?;

    let event_loop = create_event_loop().context("failed to create the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop
        .run_app(&mut app)
        .context("event loop stopped unexpectedly")?;

    app.finish()
}
