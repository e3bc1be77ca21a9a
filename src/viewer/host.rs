//! Host elements the controller drives
//!
//! The display container is required; every chrome element is optional and
//! a host that lacks one simply leaves the default no-op in place.

use super::surface::DrawingSurface;
use super::document::Viewport;

/// The scrollable area that holds the rendered page slots
pub trait DisplayContainer {
    type Surface: DrawingSurface;

    /// Allocate a fresh surface sized to `viewport`
    fn create_surface(&mut self, viewport: Viewport) -> Self::Surface;

    /// Visible width in pixels
    fn client_width(&self) -> f32;

    /// Visible height in pixels
    fn client_height(&self) -> f32;

    /// Current vertical scroll offset in content pixels
    fn scroll_top(&self) -> f32;

    /// Scroll so that content offset `offset` is at the top edge
    fn scroll_to(&mut self, offset: f32);

    /// Called whenever the slot list is torn down
    fn clear(&mut self) {}
}

/// Indicators and buttons around the document view
#[allow(unused_variables)]
pub trait ViewerChrome {
    fn show_loading(&mut self) {}

    fn hide_loading(&mut self) {}

    fn show_error(&mut self, message: &str) {}

    fn hide_error(&mut self) {}

    fn set_page_info(&mut self, current: u32, total: u32) {}

    fn set_zoom_label(&mut self, label: &str) {}

    fn set_nav_enabled(&mut self, prev: bool, next: bool) {}
}

/// A host with no chrome at all
impl ViewerChrome for () {}
