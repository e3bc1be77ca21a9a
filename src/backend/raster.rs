//! Conversion of rasterizer output into the viewer's packed RGB rasters
#![cfg_attr(not(feature = "pdf"), allow(dead_code))]

use crate::viewer::{Raster, ViewerError};

/// Shape of an interleaved, row-major sample buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SampleLayout {
    pub width: u32,
    pub height: u32,
    /// Bytes from the start of one row to the next
    pub stride: usize,
    /// Components per pixel; anything past the first three is dropped
    pub channels: usize,
}

impl SampleLayout {
    fn row_len(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Bytes needed to hold every row; the last row may omit its padding
    fn required_len(&self) -> usize {
        match self.height as usize {
            0 => 0,
            rows => (rows - 1) * self.stride + self.row_len(),
        }
    }
}

/// Pack RGB(A...) samples into a tightly packed RGB raster for `page`
pub(crate) fn pack_rgb(
    samples: &[u8],
    layout: SampleLayout,
    page: u32,
) -> Result<Raster, ViewerError> {
    if layout.channels < 3 {
        return Err(ViewerError::render(
            page,
            format!("expected RGB samples, got {} channels", layout.channels),
        ));
    }
    let row_len = layout.row_len();
    if row_len > layout.stride || samples.len() < layout.required_len() {
        return Err(ViewerError::render(
            page,
            format!(
                "sample buffer of {} bytes does not match {}x{} with stride {}",
                samples.len(),
                layout.width,
                layout.height,
                layout.stride
            ),
        ));
    }

    let mut raster = Raster {
        pixels: Vec::with_capacity(layout.width as usize * layout.height as usize * 3),
        width_px: layout.width,
        height_px: layout.height,
    };
    if row_len == 0 {
        return Ok(raster);
    }
    for row in samples.chunks(layout.stride).take(layout.height as usize) {
        raster.pixels.extend(
            row[..row_len]
                .chunks_exact(layout.channels)
                .flat_map(|pixel| &pixel[..3]),
        );
    }
    Ok(raster)
}

/// Crop or pad with white so the raster is exactly `width` x `height`.
///
/// mupdf rounds the pixmap outward, so it can be a pixel larger than the
/// truncated viewport.
pub(crate) fn fit_raster(raster: Raster, width: u32, height: u32) -> Raster {
    if raster.width_px == width && raster.height_px == height {
        return raster;
    }
    let mut out = Raster::blank(width, height);
    let copy_w = raster.width_px.min(width) as usize * 3;
    let copy_h = raster.height_px.min(height) as usize;
    let src_stride = raster.width_px as usize * 3;
    let dst_stride = width as usize * 3;
    for y in 0..copy_h {
        out.pixels[y * dst_stride..y * dst_stride + copy_w]
            .copy_from_slice(&raster.pixels[y * src_stride..y * src_stride + copy_w]);
    }
    out
}
