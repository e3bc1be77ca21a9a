//! View state management

use super::zoom::{Zoom, ZoomStep};

/// Top-level display state of the viewer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DisplayState {
    /// Nothing has been loaded yet
    #[default]
    Idle,
    /// A document is being opened and rendered
    Loading,
    /// The document is open and its pages rendered
    Ready,
    /// Opening failed; carries the banner message
    Error(String),
}

/// Current view state for one viewing session
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    /// Current page (1-indexed, 1 when nothing is loaded)
    pub current_page: u32,

    /// Total page count
    pub page_count: u32,

    /// Zoom applied to the next render pass
    pub zoom: Zoom,

    pub display: DisplayState,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_page: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.zoom.factor()
    }

    #[must_use]
    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.current_page < self.page_count
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::BeginLoad => {
                self.display = DisplayState::Loading;
                self.page_count = 0;
                self.current_page = 1;
                self.zoom.reset();
                vec![Effect::ShowLoading, Effect::ClearSlots, Effect::UpdateZoomLabel]
            }

            Command::DocumentOpened { page_count } => {
                self.page_count = page_count;
                self.current_page = 1;
                vec![Effect::UpdatePageInfo, Effect::RenderAll]
            }

            Command::LoadFinished => {
                if self.display == DisplayState::Loading {
                    self.display = DisplayState::Ready;
                    vec![Effect::HideLoading]
                } else {
                    vec![]
                }
            }

            Command::LoadFailed(message) => {
                self.display = DisplayState::Error(message.clone());
                vec![Effect::ShowError(message)]
            }

            Command::Zoom(step) => {
                if self.zoom.step(step) {
                    vec![Effect::UpdateZoomLabel, Effect::RenderAll]
                } else {
                    vec![]
                }
            }

            Command::SetScale(scale) => {
                if self.zoom.set(scale) {
                    vec![Effect::UpdateZoomLabel, Effect::RenderAll]
                } else {
                    vec![]
                }
            }

            Command::PrevPage => {
                if self.can_go_prev() {
                    self.current_page -= 1;
                    vec![
                        Effect::ScrollToPage(self.current_page),
                        Effect::UpdatePageInfo,
                    ]
                } else {
                    vec![]
                }
            }

            Command::NextPage => {
                if self.can_go_next() {
                    self.current_page += 1;
                    vec![
                        Effect::ScrollToPage(self.current_page),
                        Effect::UpdatePageInfo,
                    ]
                } else {
                    vec![]
                }
            }

            Command::GoToPage(page) => {
                if self.page_count == 0 {
                    return vec![];
                }
                let clamped = page.clamp(1, self.page_count);
                self.current_page = clamped;
                vec![Effect::ScrollToPage(clamped), Effect::UpdatePageInfo]
            }

            Command::PageScrolledIntoView(page) => {
                if self.page_count > 0 && page != self.current_page {
                    self.current_page = page.clamp(1, self.page_count);
                    vec![Effect::UpdatePageInfo]
                } else {
                    vec![]
                }
            }
        }
    }
}

/// Commands that modify view state
#[derive(Clone, Debug)]
pub enum Command {
    /// A new load started
    BeginLoad,
    /// The document opened with this many pages
    DocumentOpened { page_count: u32 },
    /// The initial render pass of a load finished
    LoadFinished,
    /// Opening failed with a banner message
    LoadFailed(String),
    /// Discrete zoom step
    Zoom(ZoomStep),
    /// Set the scale directly (fit-to-width)
    SetScale(f32),
    PrevPage,
    NextPage,
    /// Jump to a page, clamped to the document
    GoToPage(u32),
    /// Scroll tracking found a different page under the viewport center
    PageScrolledIntoView(u32),
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    ShowLoading,
    HideLoading,
    ShowError(String),
    /// Tear down every rendered slot
    ClearSlots,
    /// Run a full render pass at the current scale
    RenderAll,
    /// Bring a page's slot to the top of the container
    ScrollToPage(u32),
    /// Refresh page labels and prev/next button state
    UpdatePageInfo,
    UpdateZoomLabel,
}
