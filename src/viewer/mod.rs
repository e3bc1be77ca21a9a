//! Paginated document viewer: render passes, zoom and scroll-synced paging

mod config;
mod controller;
mod document;
mod error;
mod gate;
mod host;
mod keymap;
mod layout;
mod state;
mod surface;
mod zoom;

pub use config::{DEFAULT_FIT_PADDING, ViewerConfig};
pub use controller::PageViewerController;
pub use document::{DocumentHandle, DocumentOpener, Page, Raster, Viewport};
pub use error::{GENERIC_LOAD_FAILURE, ViewerError};
pub use gate::{Admission, BusyPolicy, RenderGate, RenderPass, Ticket};
pub use host::{DisplayContainer, ViewerChrome};
pub use keymap::{FocusTarget, ViewerAction, action_for_key};
pub use layout::{SlotBox, SlotSpacing, closest_slot, page_at_center, stack_slots};
pub use state::{Command, DisplayState, Effect, ViewState};
pub use surface::{DrawingSurface, PageSlot, PixelSurface, slot_label};
pub use zoom::{Zoom, ZoomStep, fit_width_scale};
