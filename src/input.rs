//! Translation of raw `winit` window events into the per-tick [`PointerInput`] the camera consumes.

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::camera::PointerInput;

/// Wheel units reported for one detent of a line-based wheel.
pub const WHEEL_UNITS_PER_LINE: f32 = 120.0;

/// Accumulates pointer events between ticks.
#[derive(Debug, Default)]
pub struct PointerTracker {
    x: f32,
    y: f32,
    wheel: f32,
    button_down: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.set_button(*state == ElementState::Pressed),

            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.scroll_lines(*y),
                MouseScrollDelta::PixelDelta(p) => self.scroll_pixels(p.y as f32),
            },

            // The cursor position is stale once it leaves; a held drag ends there too.
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.set_button(false);
            }

            _ => {}
        }
    }

    /// Cursor position in surface pixels.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_button(&mut self, pressed: bool) {
        self.button_down = pressed;
    }

    pub fn scroll_lines(&mut self, lines: f32) {
        self.wheel += lines * WHEEL_UNITS_PER_LINE;
    }

    pub fn scroll_pixels(&mut self, pixels: f32) {
        self.wheel += pixels;
    }

    /// Snapshot for this tick. The wheel accumulator restarts from zero.
    pub fn take_input(&mut self) -> PointerInput {
        let input = PointerInput {
            x: self.x,
            y: self.y,
            wheel_delta: self.wheel,
            button_down: self.button_down,
        };
        self.wheel = 0.0;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_lines_accumulate_until_taken() {
        let mut tracker = PointerTracker::new();
        tracker.scroll_lines(1.0);
        tracker.scroll_lines(2.0);
        assert_eq!(tracker.take_input().wheel_delta, 360.0);
        assert_eq!(tracker.take_input().wheel_delta, 0.0);
    }

    #[test]
    fn pixel_scrolling_passes_through() {
        let mut tracker = PointerTracker::new();
        tracker.scroll_pixels(-45.0);
        tracker.scroll_lines(1.0);
        assert_eq!(tracker.take_input().wheel_delta, 75.0);
    }

    #[test]
    fn cursor_and_left_button_are_tracked() {
        let mut tracker = PointerTracker::new();
        tracker.move_to(12.0, 34.0);
        tracker.set_button(true);
        let input = tracker.take_input();
        assert_eq!((input.x, input.y), (12.0, 34.0));
        assert!(input.button_down);
        assert!(tracker.take_input().button_down);
    }

    #[test]
    fn losing_focus_releases_the_button() {
        let mut tracker = PointerTracker::new();
        tracker.set_button(true);
        tracker.handle_event(&WindowEvent::Focused(false));
        assert!(!tracker.take_input().button_down);
    }
}
