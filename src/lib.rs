pub mod backend;
pub mod panic_handler;
pub mod settings;
pub mod startup;
pub mod tui;
pub mod viewer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use viewer::{PageViewerController, ViewerConfig, ViewerError};
