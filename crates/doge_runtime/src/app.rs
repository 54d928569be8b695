use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use doge_core::math::Vec2;
use doge_core::time::FrameClock;
use doge_game::{DebugMode, SceneManager};
use doge_metrics::FrameTimer;
use doge_render::window::{create_window, WindowConfig};
use doge_render::WgpuRenderer;
use doge_services::{Modifiers, Settings};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::input;

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

pub struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    manager: SceneManager,
    clock: FrameClock,
    frame_timer: FrameTimer,
    modifiers: Modifiers,
    /// Set when startup failed inside the event loop; returned from `finish`.
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let debug = DebugMode::new(settings.debug.start_in_debug_mode);
        let manager = SceneManager::new(&settings.game, debug);
        let clock = FrameClock::new(settings.simulation.max_frame_ms);
        Self {
            settings,
            window: None,
            renderer: None,
            manager,
            clock,
            frame_timer: FrameTimer::new(120),
            modifiers: Modifiers::default(),
            error: None,
        }
    }

    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => {
                info!(rounds_left = self.manager.rounds_left(), "game over");
                Ok(())
            }
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let config = WindowConfig {
            title: self.settings.window.title.clone(),
            width: self.settings.window.width,
            height: self.settings.window.height,
        };
        let window = create_window(event_loop, &config).context("failed to create the game window")?;
        let renderer = pollster::block_on(WgpuRenderer::new(Arc::clone(&window)))
            .context("failed to initialize the renderer")?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.clock = FrameClock::new(self.settings.simulation.max_frame_ms);
        info!("window ready");
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let delta_ms = self.clock.tick();
        self.manager.step(delta_ms, renderer);

        self.frame_timer.frame();
        if let Some(fps) = self.frame_timer.report_due(FPS_REPORT_INTERVAL) {
            info!(
                fps,
                ticks = self.clock.time().tick_count(),
                scene = self.manager.current_scene().name(),
                "frame rate"
            );
        }

        if self.manager.is_quit_game() {
            event_loop.exit();
        }
    }

    fn window_size(&self) -> Vec2 {
        self.window.as_ref().map_or(Vec2::ZERO, |window| {
            let size = window.inner_size();
            Vec2::new(size.width as f32, size.height as f32)
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_graphics(event_loop) {
            error!("{err:#}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = input::modifiers(modifiers.state());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = input::translate_key(event.physical_key) {
                    let action = input::key_action(event.state, event.repeat);
                    self.manager.on_key(key, action, self.modifiers);
                }
                if self.manager.is_quit_game() {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                let world = input::cursor_to_world(cursor, self.window_size());
                self.manager.on_mouse_move(world);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
