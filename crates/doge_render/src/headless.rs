//! Renderer that records frames instead of drawing them.

use doge_core::ecs::BaseRegistry;
use doge_core::math::{Vec2, Vec3};
use tracing::trace;

use crate::{build_draw_list, DrawItem, Renderer, TextRequest};

/// What one `draw`/`render_text_only` call would have put on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub items: Vec<DrawItem>,
    pub texts: Vec<TextRequest>,
    /// Set for `render_text_only` frames.
    pub background: Option<Vec3>,
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    viewport: Vec2,
    pending_texts: Vec<TextRequest>,
    last_frame: Option<RecordedFrame>,
    frames: usize,
}

impl HeadlessRenderer {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.last_frame.as_ref()
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames
    }

    fn finish(&mut self, frame: RecordedFrame) {
        trace!(
            frame = self.frames,
            items = frame.items.len(),
            texts = frame.texts.len(),
            "headless frame"
        );
        self.frames += 1;
        self.last_frame = Some(frame);
    }
}

impl Renderer for HeadlessRenderer {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn add_text(&mut self, text: TextRequest) {
        self.pending_texts.push(text);
    }

    fn draw(&mut self, registry: &BaseRegistry) {
        let frame = RecordedFrame {
            items: build_draw_list(registry),
            texts: std::mem::take(&mut self.pending_texts),
            background: None,
        };
        self.finish(frame);
    }

    fn render_text_only(&mut self, _registry: &BaseRegistry, background: Vec3) {
        let frame = RecordedFrame {
            items: Vec::new(),
            texts: std::mem::take(&mut self.pending_texts),
            background: Some(background),
        };
        self.finish(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_consumed_by_the_next_frame() {
        let mut renderer = HeadlessRenderer::new(Vec2::new(1200.0, 800.0));
        let registry = BaseRegistry::default();

        renderer.add_text(TextRequest::new("Survive in space!", Vec2::new(10.0, 20.0)));
        renderer.render_text_only(&registry, Vec3::ZERO);
        assert_eq!(renderer.last_frame().map(|f| f.texts.len()), Some(1));

        renderer.draw(&registry);
        assert_eq!(renderer.last_frame().map(|f| f.texts.len()), Some(0));
        assert_eq!(renderer.frames_rendered(), 2);
    }
}
