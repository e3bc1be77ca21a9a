//! Zoom state for the page view
//!
//! Manages the zoom factor used for every page of a render pass, its
//! discrete steps and the fit-to-width computation.

/// Zoom direction for discrete steps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
}

/// Zoom factor for page rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    /// Current zoom factor (1.0 = 100%)
    pub factor: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            factor: Self::DEFAULT_SCALE,
        }
    }
}

impl Zoom {
    /// Minimum allowed zoom factor
    pub const MIN_SCALE: f32 = 0.5;
    /// Maximum allowed zoom factor
    pub const MAX_SCALE: f32 = 3.0;
    /// Change per zoom-in/zoom-out step
    pub const SCALE_STEP: f32 = 0.25;
    /// Factor applied to a freshly loaded document
    pub const DEFAULT_SCALE: f32 = 1.0;

    /// Returns the current zoom factor
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Take one step; returns false when already at the bound
    pub fn step(&mut self, step: ZoomStep) -> bool {
        let next = match step {
            ZoomStep::In if self.factor < Self::MAX_SCALE => {
                (self.factor + Self::SCALE_STEP).min(Self::MAX_SCALE)
            }
            ZoomStep::Out if self.factor > Self::MIN_SCALE => {
                (self.factor - Self::SCALE_STEP).max(Self::MIN_SCALE)
            }
            _ => return false,
        };
        self.factor = next;
        true
    }

    /// Set an arbitrary factor, clamped; returns true if it changed
    pub fn set(&mut self, factor: f32) -> bool {
        let clamped = Self::clamp_factor(factor);
        if (self.factor - clamped).abs() > f32::EPSILON {
            self.factor = clamped;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.factor = Self::DEFAULT_SCALE;
    }

    /// Label for the zoom indicator, e.g. `125%`
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.factor * 100.0).round() as i32)
    }

    /// Clamp factor to valid range, handling NaN/Inf
    pub fn clamp_factor(factor: f32) -> f32 {
        if !factor.is_finite() {
            Self::DEFAULT_SCALE
        } else {
            factor.clamp(Self::MIN_SCALE, Self::MAX_SCALE)
        }
    }
}

/// Scale at which a page of `page_width` fills the container.
///
/// `padding` is subtracted from the container width first. Returns `None`
/// when the page has no width to fit.
#[must_use]
pub fn fit_width_scale(container_width: f32, padding: f32, page_width: f32) -> Option<f32> {
    if page_width <= 0.0 || !page_width.is_finite() {
        return None;
    }
    Some(Zoom::clamp_factor((container_width - padding) / page_width))
}
