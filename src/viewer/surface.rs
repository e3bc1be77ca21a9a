//! Drawing surfaces and the rendered page slots that own them

use async_trait::async_trait;

use super::document::{Page, Raster, Viewport};
use super::error::ViewerError;

/// A drawing target bound to one page slot
#[async_trait(?Send)]
pub trait DrawingSurface {
    /// Resize the backing store; previous content is discarded
    fn resize(&mut self, width: u32, height: u32);

    /// Render `page` at `viewport` into this surface
    async fn draw_page(&mut self, page: &dyn Page, viewport: Viewport) -> Result<(), ViewerError>;
}

/// In-memory RGB surface
#[derive(Clone, Debug, Default)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    raster: Option<Raster>,
}

impl PixelSurface {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width_px(),
            height: viewport.height_px(),
            raster: None,
        }
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Last successfully drawn image, if any
    #[must_use]
    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    /// Encode the drawn image as PNG
    pub fn save_png(&self, path: &std::path::Path) -> Result<(), ViewerError> {
        let raster = self
            .raster
            .as_ref()
            .ok_or_else(|| ViewerError::backend("surface has not been drawn"))?;
        let buffer = image::RgbImage::from_raw(
            raster.width_px,
            raster.height_px,
            raster.pixels.clone(),
        )
        .ok_or_else(|| ViewerError::backend("Raster buffer size mismatch"))?;
        buffer
            .save(path)
            .map_err(|e| ViewerError::backend(format!("cannot write {}: {e}", path.display())))
    }
}

#[async_trait(?Send)]
impl DrawingSurface for PixelSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.raster = None;
    }

    async fn draw_page(&mut self, page: &dyn Page, viewport: Viewport) -> Result<(), ViewerError> {
        let raster = page.rasterize(viewport).await?;
        let expected = self.width as usize * self.height as usize * 3;
        if raster.width_px != self.width
            || raster.height_px != self.height
            || raster.pixels.len() != expected
        {
            return Err(ViewerError::render(
                page.number(),
                format!(
                    "raster {}x{} does not fit surface {}x{}",
                    raster.width_px, raster.height_px, self.width, self.height
                ),
            ));
        }
        self.raster = Some(raster);
        Ok(())
    }
}

/// One rendered page in the display list
#[derive(Debug)]
pub struct PageSlot<S> {
    /// 1-based page number
    pub page: u32,
    pub viewport: Viewport,
    pub label: String,
    surface: Option<S>,
}

impl<S> PageSlot<S> {
    pub fn new(page: u32, viewport: Viewport, surface: S) -> Self {
        Self {
            page,
            viewport,
            label: slot_label(page),
            surface: Some(surface),
        }
    }

    /// The slot's surface; `None` while it is checked out for a redraw
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub(crate) fn check_out(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub(crate) fn check_in(&mut self, viewport: Viewport, surface: S) {
        self.viewport = viewport;
        self.surface = Some(surface);
    }
}

/// Caption shown under a rendered page
#[must_use]
pub fn slot_label(page: u32) -> String {
    format!("Page {page}")
}
