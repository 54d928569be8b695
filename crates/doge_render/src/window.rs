//! Window management
//!
//! Cross-platform window creation via winit. Windows can only be created
//! from inside `ApplicationHandler::resumed` (winit 0.30+), which is why
//! `create_window` takes the active event loop.

use std::sync::Arc;

use winit::{
    dpi::LogicalSize,
    error::{EventLoopError, OsError},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Doge Party".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// Window attributes for `config`. The game runs at a fixed size.
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(false)
}

pub fn create_event_loop() -> Result<EventLoop<()>, EventLoopError> {
    EventLoop::new()
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
) -> Result<Arc<Window>, OsError> {
    event_loop
        .create_window(window_attributes(config))
        .map(Arc::new)
}
