use raylib::prelude::*;
use tracing::{debug, warn};

use crate::constants::*;
use crate::viewer::layout::line_height;

const BACKGROUND: Color = Color::new(28, 30, 36, 255);
const TOOLBAR: Color = Color::new(42, 45, 54, 255);
const TEXT: Color = Color::new(220, 223, 228, 255);
const BUTTON: Color = Color::new(70, 74, 88, 255);

/// Code display surface with a copy-to-clipboard button. It receives the
/// slide's code verbatim and owns the "Copied" feedback.
#[derive(Debug, Default)]
pub struct CodeBlock {
    copied: Option<(usize, f32)>,   // Slide position and remaining feedback time
}

impl CodeBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy_button(frame: Rectangle) -> Rectangle {
        Rectangle::new(
            frame.x + frame.width - COPY_BUTTON_WIDTH - 6.0,
            frame.y + 4.0,
            COPY_BUTTON_WIDTH,
            CODE_TOOLBAR_HEIGHT - 8.0,
        )
    }

    pub fn copy(&mut self, rl: &mut RaylibHandle, position: usize, code: &str) {
        if let Err(e) = rl.set_clipboard_text(code) {
            warn!(position, error = %e, "code contains a NUL byte, not copied");
            return;
        }
        debug!(position, bytes = code.len(), "code copied to clipboard");
        self.mark_copied(position);
    }

    fn mark_copied(&mut self, position: usize) {
        self.copied = Some((position, COPIED_FEEDBACK_DURATION));
    }

    pub fn is_copied(&self, position: usize) -> bool {
        matches!(self.copied, Some((copied, _)) if copied == position)
    }

    pub fn update(&mut self, dt: f32) {
        if let Some((position, remaining)) = self.copied {
            let remaining = remaining - dt;
            self.copied = (remaining > 0.0).then_some((position, remaining));
        }
    }

    pub fn draw<D: RaylibDraw>(&self, d: &mut D, frame: Rectangle, position: usize, code: &str) {
        d.draw_rectangle_rec(frame, BACKGROUND);
        d.draw_rectangle_rec(
            Rectangle::new(frame.x, frame.y, frame.width, CODE_TOOLBAR_HEIGHT),
            TOOLBAR,
        );

        let button = Self::copy_button(frame);
        d.draw_rectangle_rec(button, BUTTON);
        let label = if self.is_copied(position) { "Copied" } else { "Copy" };
        d.draw_text(
            label,
            (button.x + 12.0) as i32,
            (button.y + (button.height - COUNT_FONT_SIZE as f32) * 0.5) as i32,
            COUNT_FONT_SIZE,
            TEXT,
        );

        let top = frame.y + CODE_TOOLBAR_HEIGHT + CODE_PADDING;
        for (i, line) in code.lines().enumerate() {
            d.draw_text(
                &line.replace('\t', "    "),
                (frame.x + CODE_PADDING) as i32,
                (top + i as f32 * line_height(CODE_FONT_SIZE)) as i32,
                CODE_FONT_SIZE,
                TEXT,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_button_sits_in_the_toolbar() {
        let frame = Rectangle::new(100.0, 50.0, 600.0, 200.0);
        let button = CodeBlock::copy_button(frame);
        assert!(button.y >= frame.y);
        assert!(button.y + button.height <= frame.y + CODE_TOOLBAR_HEIGHT);
        assert!(button.x + button.width <= frame.x + frame.width);
    }

    #[test]
    fn copied_feedback_expires() {
        let mut block = CodeBlock::new();
        block.mark_copied(2);
        assert!(block.is_copied(2));
        assert!(!block.is_copied(1));

        block.update(COPIED_FEEDBACK_DURATION * 0.5);
        assert!(block.is_copied(2));
        block.update(COPIED_FEEDBACK_DURATION);
        assert!(!block.is_copied(2));
    }
}
