//! Doge Party Render System
//!
//! Scenes talk to the renderer only through the [`Renderer`] trait. Two
//! backends implement it: [`WgpuRenderer`] draws into a winit window, and
//! [`HeadlessRenderer`] records what would have been drawn (tests, tooling).

mod draw_list;
mod gpu;
mod headless;
mod text;
pub mod window;

pub use draw_list::{build_draw_list, DrawItem};
pub use gpu::WgpuRenderer;
pub use headless::{HeadlessRenderer, RecordedFrame};

pub use wgpu;
pub use winit;

use doge_core::components::GeometryId;
use doge_core::ecs::BaseRegistry;
use doge_core::math::{Vec2, Vec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a drawing surface for the window")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter is compatible with the window surface")]
    NoAdapter,

    #[error("failed to open the graphics device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("the window surface reports no supported texture format")]
    NoSurfaceFormat,
}

/// Native size of a geometry, before the entity's transform scale applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub original_size: Vec2,
}

pub fn mesh_for(geometry: GeometryId) -> Mesh {
    let original_size = match geometry {
        GeometryId::Sprite | GeometryId::DebugLine => Vec2::ONE,
    };
    Mesh { original_size }
}

/// A line of text queued for the next frame, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub text: String,
    pub position: Vec2,
    pub scale: f32,
    pub color: Vec3,
}

impl TextRequest {
    pub fn new(text: impl Into<String>, position: Vec2) -> Self {
        Self {
            text: text.into(),
            position,
            scale: 1.0,
            color: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }
}

/// Drawing interface shared by all scenes.
///
/// Text requests accumulate until the next `draw` or `render_text_only`,
/// which consumes them.
pub trait Renderer {
    /// Drawable size in pixels.
    fn viewport(&self) -> Vec2;

    fn mesh(&self, geometry: GeometryId) -> Mesh {
        mesh_for(geometry)
    }

    fn add_text(&mut self, text: TextRequest);

    /// Draw every entity of `registry` that carries a render request.
    fn draw(&mut self, registry: &BaseRegistry);

    /// Draw only the queued text over a flat background.
    fn render_text_only(&mut self, registry: &BaseRegistry, background: Vec3);
}
