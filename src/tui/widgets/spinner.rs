//! Loading spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Waiting indicator with an optional dimmed detail line below
pub struct Spinner<'a> {
    frame: usize,
    message: &'a str,
    detail: Option<&'a str>,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, message: &'a str) -> Self {
        Self {
            frame,
            message,
            detail: None,
        }
    }

    pub fn detail(mut self, detail: &'a str) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn char_at(frame: usize) -> char {
        SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
    }

    pub fn current_char(&self) -> char {
        Self::char_at(self.frame)
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }
}

fn centered_x(area: Rect, text: &str) -> u16 {
    area.x + area.width.saturating_sub(text.chars().count() as u16) / 2
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 20 {
            return;
        }

        let y = area.y + area.height / 2;
        let text = format!("{} {}", self.current_char(), self.message);
        buf.set_string(centered_x(area, &text), y, &text, Style::default().fg(Color::Cyan));

        if let Some(detail) = self.detail.filter(|_| y + 1 < area.bottom()) {
            buf.set_string(
                centered_x(area, detail),
                y + 1,
                detail,
                Style::default().fg(Color::DarkGray),
            );
        }
    }
}
