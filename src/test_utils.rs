//! In-memory collaborators for exercising the viewer without a rendering
//! engine or a terminal.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::viewer::{
    DisplayContainer, DocumentHandle, DocumentOpener, DrawingSurface, Page, Raster, ViewerChrome,
    ViewerError, Viewport,
};

/// Blocks page rasterization until permits are released.
///
/// Each rasterized page consumes one permit, so `release(n)` lets exactly
/// `n` more pages through.
#[derive(Clone, Debug)]
pub struct RenderHold {
    permits: Rc<Semaphore>,
}

impl Default for RenderHold {
    fn default() -> Self {
        Self::closed()
    }
}

impl RenderHold {
    pub fn closed() -> Self {
        Self {
            permits: Rc::new(Semaphore::new(0)),
        }
    }

    pub fn release(&self, pages: usize) {
        self.permits.add_permits(pages);
    }

    pub fn release_all(&self) {
        self.permits.add_permits(10_000);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

/// Record of everything the fake backend was asked to do
#[derive(Debug, Default)]
pub struct RenderLog {
    pub opened: Vec<String>,
    pub fetched: Vec<u32>,
    /// (page, viewport) for every rasterization, including failing ones
    pub rasterized: Vec<(u32, Viewport)>,
}

#[derive(Clone, Debug)]
struct PageSpec {
    width: f32,
    height: f32,
    fail_fetch: bool,
    fail_render: bool,
}

impl PageSpec {
    fn sized(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fail_fetch: false,
            fail_render: false,
        }
    }
}

#[derive(Clone, Debug)]
enum DocumentSpec {
    Pages(Vec<PageSpec>),
    Broken(String),
}

/// Opener serving documents registered by URL
#[derive(Clone, Debug, Default)]
pub struct FakeOpener {
    documents: HashMap<String, DocumentSpec>,
    hold: Option<RenderHold>,
    log: Rc<RefCell<RenderLog>>,
}

pub const DEFAULT_PAGE_WIDTH: f32 = 500.0;
pub const DEFAULT_PAGE_HEIGHT: f32 = 700.0;

impl FakeOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `page_count` pages of the default size
    pub fn with_document(self, url: &str, page_count: u32) -> Self {
        let sizes = (0..page_count)
            .map(|_| (DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT))
            .collect();
        self.with_pages(url, sizes)
    }

    /// Register a document with explicit unscaled page sizes
    pub fn with_pages(mut self, url: &str, sizes: Vec<(f32, f32)>) -> Self {
        let pages = sizes
            .into_iter()
            .map(|(width, height)| PageSpec::sized(width, height))
            .collect();
        self.documents
            .insert(url.to_string(), DocumentSpec::Pages(pages));
        self
    }

    /// Opening `url` fails with `detail` (may be empty)
    pub fn failing_open(mut self, url: &str, detail: &str) -> Self {
        self.documents
            .insert(url.to_string(), DocumentSpec::Broken(detail.to_string()));
        self
    }

    pub fn failing_render(self, url: &str, page: u32) -> Self {
        self.edit_page(url, page, |spec| spec.fail_render = true)
    }

    pub fn failing_fetch(self, url: &str, page: u32) -> Self {
        self.edit_page(url, page, |spec| spec.fail_fetch = true)
    }

    /// Gate every rasterization behind `hold`
    pub fn with_hold(mut self, hold: RenderHold) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn log(&self) -> Rc<RefCell<RenderLog>> {
        Rc::clone(&self.log)
    }

    fn edit_page(mut self, url: &str, page: u32, edit: impl FnOnce(&mut PageSpec)) -> Self {
        if let Some(DocumentSpec::Pages(pages)) = self.documents.get_mut(url) {
            if let Some(spec) = page.checked_sub(1).and_then(|i| pages.get_mut(i as usize)) {
                edit(spec);
            }
        }
        self
    }
}

#[async_trait(?Send)]
impl DocumentOpener for FakeOpener {
    type Document = FakeDocument;

    async fn open(&self, url: &str) -> Result<FakeDocument, ViewerError> {
        self.log.borrow_mut().opened.push(url.to_string());
        match self.documents.get(url) {
            Some(DocumentSpec::Pages(pages)) => Ok(FakeDocument {
                pages: pages.clone(),
                hold: self.hold.clone(),
                log: Rc::clone(&self.log),
            }),
            Some(DocumentSpec::Broken(detail)) => Err(ViewerError::open(url, detail.as_str())),
            None => Err(ViewerError::open(url, format!("{url} not found"))),
        }
    }
}

#[derive(Debug)]
pub struct FakeDocument {
    pages: Vec<PageSpec>,
    hold: Option<RenderHold>,
    log: Rc<RefCell<RenderLog>>,
}

#[async_trait(?Send)]
impl DocumentHandle for FakeDocument {
    type Page = FakePage;

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn page(&self, number: u32) -> Result<FakePage, ViewerError> {
        self.log.borrow_mut().fetched.push(number);
        let spec = number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or(ViewerError::PageUnavailable { page: number })?;
        if spec.fail_fetch {
            return Err(ViewerError::PageUnavailable { page: number });
        }
        Ok(FakePage {
            number,
            spec: spec.clone(),
            hold: self.hold.clone(),
            log: Rc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
pub struct FakePage {
    number: u32,
    spec: PageSpec,
    hold: Option<RenderHold>,
    log: Rc<RefCell<RenderLog>>,
}

#[async_trait(?Send)]
impl Page for FakePage {
    fn number(&self) -> u32 {
        self.number
    }

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport::scaled(self.spec.width, self.spec.height, scale)
    }

    /// Produces a white page of the requested size.
    async fn rasterize(&self, viewport: Viewport) -> Result<Raster, ViewerError> {
        if let Some(hold) = &self.hold {
            hold.pass().await;
        }
        self.log
            .borrow_mut()
            .rasterized
            .push((self.number, viewport));
        if self.spec.fail_render {
            return Err(ViewerError::render(self.number, "corrupt page data"));
        }
        Ok(Raster::blank(viewport.width_px(), viewport.height_px()))
    }
}

/// Surface that remembers what was drawn into it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FakeSurface {
    pub width: u32,
    pub height: u32,
    pub draws: u32,
    pub last_page: Option<u32>,
}

#[async_trait(?Send)]
impl DrawingSurface for FakeSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    async fn draw_page(&mut self, page: &dyn Page, viewport: Viewport) -> Result<(), ViewerError> {
        page.rasterize(viewport).await?;
        self.draws += 1;
        self.last_page = Some(page.number());
        Ok(())
    }
}

/// Scroll container with fixed client size
#[derive(Clone, Debug, Default)]
pub struct FakeContainer {
    pub width: f32,
    pub height: f32,
    pub scroll_top: f32,
    pub surfaces_created: usize,
    pub clears: usize,
    scrolls: Vec<f32>,
}

impl FakeContainer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Offsets passed to `scroll_to`, oldest first
    pub fn scroll_history(&self) -> Vec<f32> {
        self.scrolls.clone()
    }

    /// Simulate the user scrolling (not a programmatic `scroll_to`)
    pub fn user_scroll(&mut self, offset: f32) {
        self.scroll_top = offset;
    }
}

impl DisplayContainer for FakeContainer {
    type Surface = FakeSurface;

    fn create_surface(&mut self, viewport: Viewport) -> FakeSurface {
        self.surfaces_created += 1;
        FakeSurface {
            width: viewport.width_px(),
            height: viewport.height_px(),
            ..FakeSurface::default()
        }
    }

    fn client_width(&self) -> f32 {
        self.width
    }

    fn client_height(&self) -> f32 {
        self.height
    }

    fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn scroll_to(&mut self, offset: f32) {
        self.scroll_top = offset;
        self.scrolls.push(offset);
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

/// Chrome that records the last value pushed to each element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FakeChrome {
    pub loading: bool,
    pub error: Option<String>,
    pub page_info: Option<(u32, u32)>,
    pub zoom_label: Option<String>,
    pub nav_enabled: Option<(bool, bool)>,
}

impl ViewerChrome for FakeChrome {
    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn set_page_info(&mut self, current: u32, total: u32) {
        self.page_info = Some((current, total));
    }

    fn set_zoom_label(&mut self, label: &str) {
        self.zoom_label = Some(label.to_string());
    }

    fn set_nav_enabled(&mut self, prev: bool, next: bool) {
        self.nav_enabled = Some((prev, next));
    }
}
