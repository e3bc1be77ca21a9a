//! mupdf-backed documents

use async_trait::async_trait;
use log::debug;
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::local_path;
use super::raster::{SampleLayout, fit_raster, pack_rgb};
use crate::viewer::{DocumentHandle, DocumentOpener, Page, Raster, ViewerError, Viewport};

/// Opens PDF (and other mupdf-supported) files from local paths
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfOpener;

#[async_trait(?Send)]
impl DocumentOpener for MupdfOpener {
    type Document = MupdfDocument;

    async fn open(&self, url: &str) -> Result<MupdfDocument, ViewerError> {
        let path = local_path(url).map_err(|detail| ViewerError::open(url, detail))?;
        let doc = Document::open(path).map_err(|e| ViewerError::open(url, e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| ViewerError::open(url, e.to_string()))?;
        debug!("mupdf opened {path} ({page_count} pages)");
        Ok(MupdfDocument {
            doc,
            page_count: page_count.max(0) as u32,
        })
    }
}

pub struct MupdfDocument {
    doc: Document,
    page_count: u32,
}

#[async_trait(?Send)]
impl DocumentHandle for MupdfDocument {
    type Page = MupdfPage;

    fn page_count(&self) -> u32 {
        self.page_count
    }

    async fn page(&self, number: u32) -> Result<MupdfPage, ViewerError> {
        if number == 0 || number > self.page_count {
            return Err(ViewerError::PageUnavailable { page: number });
        }
        let page = self.doc.load_page((number - 1) as i32)?;
        let bounds = page.bounds()?;
        Ok(MupdfPage {
            page,
            number,
            width: bounds.x1 - bounds.x0,
            height: bounds.y1 - bounds.y0,
        })
    }
}

pub struct MupdfPage {
    page: mupdf::Page,
    number: u32,
    width: f32,
    height: f32,
}

#[async_trait(?Send)]
impl Page for MupdfPage {
    fn number(&self) -> u32 {
        self.number
    }

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport::scaled(self.width, self.height, scale)
    }

    async fn rasterize(&self, viewport: Viewport) -> Result<Raster, ViewerError> {
        // Let pending input run before a potentially long rasterization.
        tokio::task::yield_now().await;

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ViewerError::render(self.number, "page has an empty media box"));
        }
        let transform = Matrix::new_scale(viewport.width / self.width, viewport.height / self.height);
        let rgb = Colorspace::device_rgb();
        let pixmap = self.page.to_pixmap(&transform, &rgb, false, false)?;
        let raster = pixmap_to_raster(&pixmap, self.number)?;
        Ok(fit_raster(raster, viewport.width_px(), viewport.height_px()))
    }
}

fn pixmap_to_raster(pixmap: &Pixmap, page: u32) -> Result<Raster, ViewerError> {
    let layout = SampleLayout {
        width: pixmap.width(),
        height: pixmap.height(),
        stride: pixmap.stride() as usize,
        channels: pixmap.n() as usize,
    };
    pack_rgb(pixmap.samples(), layout, page)
}
