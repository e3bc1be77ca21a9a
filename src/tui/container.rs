//! Virtual scroll container and status chrome for the terminal host

use crate::viewer::{DisplayContainer, PixelSurface, ViewerChrome, Viewport};

/// A scrollable column of page surfaces with a fixed pixel viewport.
///
/// The terminal cannot show the pixels, so the container only tracks the
/// geometry the controller needs for fit and scroll sync.
#[derive(Debug, Clone)]
pub struct TerminalContainer {
    width: f32,
    height: f32,
    scroll_top: f32,
}

impl TerminalContainer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_top: 0.0,
        }
    }

    /// User scroll by `delta`, kept inside `[0, content_height - height]`
    pub fn scroll_by(&mut self, delta: f32, content_height: f32) {
        let max = (content_height - self.height).max(0.0);
        self.scroll_top = (self.scroll_top + delta).clamp(0.0, max);
    }
}

impl DisplayContainer for TerminalContainer {
    type Surface = PixelSurface;

    fn create_surface(&mut self, viewport: Viewport) -> PixelSurface {
        PixelSurface::new(viewport)
    }

    fn client_width(&self) -> f32 {
        self.width
    }

    fn client_height(&self) -> f32 {
        self.height
    }

    fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn scroll_to(&mut self, offset: f32) {
        self.scroll_top = offset.max(0.0);
    }

    fn clear(&mut self) {
        self.scroll_top = 0.0;
    }
}

/// What the status bar shows; filled in by the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusChrome {
    pub loading: bool,
    pub error: Option<String>,
    pub page_info: Option<(u32, u32)>,
    pub zoom_label: Option<String>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl ViewerChrome for StatusChrome {
    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn set_page_info(&mut self, current: u32, total: u32) {
        self.page_info = Some((current, total));
    }

    fn set_zoom_label(&mut self, label: &str) {
        self.zoom_label = Some(label.to_string());
    }

    fn set_nav_enabled(&mut self, prev: bool, next: bool) {
        self.prev_enabled = prev;
        self.next_enabled = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_scroll_stays_inside_content() {
        let mut container = TerminalContainer::new(1040.0, 900.0);

        container.scroll_by(-50.0, 3000.0);
        assert_eq!(container.scroll_top(), 0.0);

        container.scroll_by(5000.0, 3000.0);
        assert_eq!(container.scroll_top(), 2100.0);

        container.scroll_by(100.0, 500.0);
        assert_eq!(container.scroll_top(), 0.0);
    }

    #[test]
    fn clearing_resets_scroll() {
        let mut container = TerminalContainer::new(100.0, 100.0);
        container.scroll_to(40.0);
        container.clear();
        assert_eq!(container.scroll_top(), 0.0);
    }
}
