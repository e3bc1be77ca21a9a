//! Errors raised by documents, pages and drawing surfaces

/// Message shown when an open failure carries no detail of its own
pub const GENERIC_LOAD_FAILURE: &str = "Failed to load PDF document";

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("cannot open {url}: {}", detail.as_deref().unwrap_or(GENERIC_LOAD_FAILURE))]
    Open { url: String, detail: Option<String> },

    #[error("page {page} is not available")]
    PageUnavailable { page: u32 },

    #[error("page {page} failed to render: {detail}")]
    Render { page: u32, detail: String },

    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("{detail}")]
    Backend { detail: String },
}

impl ViewerError {
    pub fn open(url: impl Into<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Open {
            url: url.into(),
            detail: (!detail.trim().is_empty()).then_some(detail),
        }
    }

    pub fn render(page: u32, detail: impl Into<String>) -> Self {
        Self::Render {
            page,
            detail: detail.into(),
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend { detail: msg.into() }
    }

    /// Human-readable text for the error banner.
    ///
    /// Open failures show only their detail; an empty detail falls back to
    /// [`GENERIC_LOAD_FAILURE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Open { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| GENERIC_LOAD_FAILURE.to_string()),
            Self::Backend { detail } if detail.trim().is_empty() => {
                GENERIC_LOAD_FAILURE.to_string()
            }
            other => other.to_string(),
        }
    }
}
