//! Document-opening primitives
//!
//! The controller never talks to a rendering engine directly. It goes
//! through these traits, so a mupdf backend, a browser bridge or a test fake
//! can sit behind the same render loop. All of them are `?Send`: the viewer
//! runs on a single cooperative thread.

use async_trait::async_trait;

use super::error::ViewerError;

/// Pixel dimensions a page renders to at a given scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Unscaled page size multiplied by `scale`
    #[must_use]
    pub fn scaled(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width: width * scale,
            height: height * scale,
        }
    }

    /// Surface width in whole pixels (fractional pixels are truncated)
    #[must_use]
    pub fn width_px(&self) -> u32 {
        self.width.max(0.0) as u32
    }

    /// Surface height in whole pixels (fractional pixels are truncated)
    #[must_use]
    pub fn height_px(&self) -> u32 {
        self.height.max(0.0) as u32
    }
}

/// Raw rendered page image.
///
/// RGB pixel data, 3 bytes per pixel, row-major without padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    pub pixels: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl Raster {
    /// A white raster of the given size
    #[must_use]
    pub fn blank(width_px: u32, height_px: u32) -> Self {
        Self {
            pixels: vec![0xFF; width_px as usize * height_px as usize * 3],
            width_px,
            height_px,
        }
    }
}

/// A single page fetched from a [`DocumentHandle`]
#[async_trait(?Send)]
pub trait Page {
    /// 1-based page number
    fn number(&self) -> u32;

    /// Dimensions of this page at `scale`
    fn viewport(&self, scale: f32) -> Viewport;

    /// Render the page at the given viewport
    async fn rasterize(&self, viewport: Viewport) -> Result<Raster, ViewerError>;
}

/// An opened paginated document
#[async_trait(?Send)]
pub trait DocumentHandle {
    type Page: Page;

    fn page_count(&self) -> u32;

    /// Fetch a page by 1-based index
    async fn page(&self, number: u32) -> Result<Self::Page, ViewerError>;
}

/// Opens documents from a caller-supplied URL.
///
/// The URL is passed through untouched; validating it is the opener's job.
#[async_trait(?Send)]
pub trait DocumentOpener {
    type Document: DocumentHandle;

    async fn open(&self, url: &str) -> Result<Self::Document, ViewerError>;
}
