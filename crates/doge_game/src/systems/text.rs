//! Text layout helpers
//!
//! Positions are given in normalized screen coordinates with the origin at
//! the bottom left (`(0.02, 0.9)` is near the top left corner) and converted
//! to the renderer's pixel space.

use doge_core::math::{Vec2, Vec3};
use doge_render::{Renderer, TextRequest};

/// Vertical distance between lines, in normalized units per unit of scale.
const LINE_SPACING: f32 = 0.045;

pub fn screen_point(viewport: Vec2, normalized: Vec2) -> Vec2 {
    Vec2::new(normalized.x * viewport.x, (1.0 - normalized.y) * viewport.y)
}

/// Greedy word wrap to at most `columns` characters per line. Words longer
/// than a line get a line of their own.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { word.len() } else { line.len() + 1 + word.len() };
        if needed > columns && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Queue `lines` top to bottom starting at `origin`.
pub fn queue_lines<S: AsRef<str>>(
    renderer: &mut dyn Renderer,
    lines: &[S],
    origin: Vec2,
    scale: f32,
    color: Vec3,
) {
    let viewport = renderer.viewport();
    for (row, line) in lines.iter().enumerate() {
        let normalized = origin - Vec2::new(0.0, row as f32 * LINE_SPACING * scale);
        renderer.add_text(
            TextRequest::new(line.as_ref(), screen_point(viewport, normalized))
                .with_scale(scale)
                .with_color(color),
        );
    }
}

pub fn queue_block(
    renderer: &mut dyn Renderer,
    text: &str,
    columns: usize,
    origin: Vec2,
    scale: f32,
) {
    queue_lines(renderer, &wrap(text, columns), origin, scale, Vec3::ONE);
}

/// Reveals a text one character per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Typewriter {
    revealed: usize,
}

impl Typewriter {
    pub fn reset(&mut self) {
        self.revealed = 0;
    }

    pub fn advance(&mut self) {
        self.revealed += 1;
    }

    pub fn finish(&mut self, text: &str) {
        self.revealed = text.chars().count();
    }

    pub fn is_done(&self, text: &str) -> bool {
        self.revealed >= text.chars().count()
    }

    pub fn visible<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.revealed) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doge_render::HeadlessRenderer;

    #[test]
    fn test_wrap_respects_columns() {
        let lines = wrap("the quick brown fox jumps over the lazy doge", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "doge"]);
        assert!(wrap("   ", 10).is_empty());
        assert_eq!(wrap("supercalifragilistic ok", 5), vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_typewriter_reveals_by_character() {
        let story = "Doge!";
        let mut typewriter = Typewriter::default();
        assert_eq!(typewriter.visible(story), "");
        typewriter.advance();
        typewriter.advance();
        assert_eq!(typewriter.visible(story), "Do");
        assert!(!typewriter.is_done(story));
        typewriter.finish(story);
        assert_eq!(typewriter.visible(story), story);
        assert!(typewriter.is_done(story));
    }

    #[test]
    fn test_lines_stack_downwards() {
        let mut renderer = HeadlessRenderer::new(Vec2::new(1000.0, 1000.0));
        queue_lines(&mut renderer, &["a", "b"], Vec2::new(0.1, 0.9), 1.0, Vec3::ONE);
        renderer.render_text_only(&Default::default(), Vec3::ZERO);

        let texts = &renderer.last_frame().unwrap().texts;
        assert_eq!(texts.len(), 2);
        assert!(texts[1].position.y > texts[0].position.y);
        assert_eq!(texts[0].position.x, 100.0);
    }
}
