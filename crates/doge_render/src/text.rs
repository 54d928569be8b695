//! Text pass for the wgpu backend
//!
//! Queued [`TextRequest`]s are shaped with glyphon each frame and drawn on
//! top of the quads, inside the same render pass.

use doge_core::math::{Vec2, Vec3};
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};
use tracing::{trace, warn};

use crate::TextRequest;

/// Font size in pixels at `scale == 1.0`.
const BASE_FONT_PX: f32 = 32.0;
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Where and how one request lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TextPlacement {
    left: f32,
    top: f32,
    font_size: f32,
    line_height: f32,
    color: [u8; 3],
}

impl TextPlacement {
    /// `None` for requests that would draw nothing.
    fn of(request: &TextRequest) -> Option<Self> {
        if request.text.trim().is_empty() || request.scale <= 0.0 {
            return None;
        }
        let font_size = BASE_FONT_PX * request.scale;
        Some(Self {
            left: request.position.x,
            top: request.position.y,
            font_size,
            line_height: font_size * LINE_HEIGHT_FACTOR,
            color: color_bytes(request.color),
        })
    }
}

fn color_bytes(color: Vec3) -> [u8; 3] {
    let clamped = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    [clamped.x, clamped.y, clamped.z].map(|c| c.round() as u8)
}

fn viewport_bounds(viewport: Vec2) -> TextBounds {
    TextBounds {
        left: 0,
        top: 0,
        right: viewport.x as i32,
        bottom: viewport.y as i32,
    }
}

pub(crate) struct TextPass {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    buffers: Vec<(Buffer, TextPlacement)>,
}

impl TextPass {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
    ) -> Self {
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer =
            TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            viewport,
            atlas,
            renderer,
            buffers: Vec::new(),
        }
    }

    /// Shape `requests` and upload their glyphs. Returns whether there is
    /// anything to render.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: Vec2,
        requests: &[TextRequest],
    ) -> bool {
        self.buffers.clear();
        for request in requests {
            let Some(placement) = TextPlacement::of(request) else {
                continue;
            };
            let mut buffer = Buffer::new(
                &mut self.font_system,
                Metrics::new(placement.font_size, placement.line_height),
            );
            buffer.set_size(
                &mut self.font_system,
                Some((size.x - placement.left).max(0.0)),
                Some(placement.line_height),
            );
            buffer.set_text(
                &mut self.font_system,
                &request.text,
                Attrs::new().family(Family::SansSerif),
                Shaping::Basic,
            );
            buffer.shape_until_scroll(&mut self.font_system, false);
            self.buffers.push((buffer, placement));
        }
        if self.buffers.is_empty() {
            return false;
        }

        self.viewport.update(
            queue,
            Resolution {
                width: size.x as u32,
                height: size.y as u32,
            },
        );
        let bounds = viewport_bounds(size);
        let areas = self.buffers.iter().map(|(buffer, placement)| {
            let [r, g, b] = placement.color;
            TextArea {
                buffer,
                left: placement.left,
                top: placement.top,
                scale: 1.0,
                bounds,
                default_color: Color::rgb(r, g, b),
                custom_glyphs: &[],
            }
        });

        match self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        ) {
            Ok(()) => {
                trace!(count = self.buffers.len(), "text prepared");
                true
            }
            Err(err) => {
                warn!(%err, "failed to prepare text, skipping it this frame");
                false
            }
        }
    }

    pub(crate) fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Err(err) = self.renderer.render(&self.atlas, &self.viewport, pass) {
            warn!(%err, "failed to render text");
        }
    }

    /// Drop glyphs no longer in use. Call once the frame is submitted.
    pub(crate) fn trim(&mut self) {
        self.atlas.trim();
    }
}
