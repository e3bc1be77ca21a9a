//! Page viewer controller
//!
//! Owns the open document, the view state and the rendered slot list, and
//! turns user actions into state commands, host updates and render passes.
//!
//! Everything runs on one cooperative thread. Methods take `&self` and keep
//! no `RefCell` borrow alive across an await, so a suspended render pass can
//! be interleaved with scroll, navigation or zoom events. The [`RenderGate`]
//! is the only thing that serializes writers of the slot list.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crossterm::event::KeyEvent;
use log::{debug, error, info, warn};

use super::config::ViewerConfig;
use super::document::{DocumentHandle, DocumentOpener, Page};
use super::gate::{Admission, RenderGate, RenderPass};
use super::host::{DisplayContainer, ViewerChrome};
use super::keymap::{FocusTarget, ViewerAction, action_for_key};
use super::layout::{SlotBox, page_at_center, stack_slots};
use super::state::{Command, DisplayState, Effect, ViewState};
use super::surface::{DrawingSurface, PageSlot};
use super::zoom::{ZoomStep, fit_width_scale};

type SurfaceOf<C> = <C as DisplayContainer>::Surface;

/// What a running pass should do after resuming from an await
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PassCheck {
    Current,
    Restart,
    Abandon,
}

/// Inputs frozen at the start of a pass
struct PassInput<D> {
    document: Rc<D>,
    scale: f32,
    epoch: u64,
}

pub struct PageViewerController<O, C, H = ()>
where
    O: DocumentOpener,
    C: DisplayContainer,
    H: ViewerChrome,
{
    opener: O,
    container: RefCell<C>,
    chrome: RefCell<H>,
    config: ViewerConfig,
    document: RefCell<Option<Rc<O::Document>>>,
    /// Bumped on every load; passes over an older document are discarded
    epoch: Cell<u64>,
    last_url: RefCell<Option<String>>,
    view: RefCell<ViewState>,
    slots: RefCell<Vec<PageSlot<SurfaceOf<C>>>>,
    gate: RenderGate,
}

impl<O, C, H> PageViewerController<O, C, H>
where
    O: DocumentOpener,
    C: DisplayContainer,
    H: ViewerChrome,
{
    pub fn new(opener: O, container: C, chrome: H, config: ViewerConfig) -> Self {
        Self {
            opener,
            container: RefCell::new(container),
            chrome: RefCell::new(chrome),
            config,
            document: RefCell::new(None),
            epoch: Cell::new(0),
            last_url: RefCell::new(None),
            view: RefCell::new(ViewState::new()),
            slots: RefCell::new(Vec::new()),
            gate: RenderGate::new(config.busy_policy),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn current_page(&self) -> u32 {
        self.view.borrow().current_page
    }

    pub fn page_count(&self) -> u32 {
        self.view.borrow().page_count
    }

    pub fn scale(&self) -> f32 {
        self.view.borrow().scale()
    }

    pub fn zoom_label(&self) -> String {
        self.view.borrow().zoom.percent_label()
    }

    pub fn display_state(&self) -> DisplayState {
        self.view.borrow().display.clone()
    }

    /// True while a render pass holds the slot list
    pub fn is_rendering(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.borrow().clone()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Page numbers of the rendered slots, in display order
    pub fn slot_pages(&self) -> Vec<u32> {
        self.slots.borrow().iter().map(|slot| slot.page).collect()
    }

    pub fn with_slots<R>(&self, f: impl FnOnce(&[PageSlot<SurfaceOf<C>>]) -> R) -> R {
        f(&self.slots.borrow())
    }

    /// Slot positions in content coordinates
    pub fn slot_boxes(&self) -> Vec<SlotBox> {
        let slots = self.slots.borrow();
        stack_slots(
            slots.iter().map(|slot| (slot.page, slot.viewport)),
            self.config.spacing,
        )
    }

    pub fn container(&self) -> Ref<'_, C> {
        self.container.borrow()
    }

    /// Mutable host access, e.g. to apply a user scroll before
    /// [`handle_scroll`](Self::handle_scroll)
    pub fn container_mut(&self) -> RefMut<'_, C> {
        self.container.borrow_mut()
    }

    pub fn chrome(&self) -> Ref<'_, H> {
        self.chrome.borrow()
    }

    /// Open `url` and render every page.
    ///
    /// Any previous document is discarded first. Failures end in
    /// [`DisplayState::Error`]; nothing is returned to the caller.
    pub async fn load_document(&self, url: &str) {
        info!("Opening document {url}");
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        *self.last_url.borrow_mut() = Some(url.to_string());
        self.document.borrow_mut().take();
        let _ = self.apply(Command::BeginLoad);

        match self.opener.open(url).await {
            Ok(document) => {
                if self.epoch.get() != epoch {
                    debug!("Discarding {url}: a newer load started");
                    return;
                }
                let page_count = document.page_count();
                info!("Opened {url} with {page_count} pages");
                *self.document.borrow_mut() = Some(Rc::new(document));

                // A pass over the previous document would drop our render
                // request; it abandons itself at its next check, so wait it out.
                if !self.gate.policy().restarts() && self.gate.is_busy() {
                    self.gate.wait_idle().await;
                    if self.epoch.get() != epoch {
                        return;
                    }
                }

                self.dispatch(Command::DocumentOpened { page_count }).await;

                if self.epoch.get() == epoch {
                    let _ = self.apply(Command::LoadFinished);
                }
            }
            Err(e) => {
                if self.epoch.get() != epoch {
                    return;
                }
                error!("Error loading document {url}: {e}");
                let _ = self.apply(Command::LoadFailed(e.user_message()));
            }
        }
    }

    /// Reload the last requested URL
    pub async fn retry(&self) {
        let Some(url) = self.last_url() else {
            warn!("Retry requested before any document was loaded");
            return;
        };
        self.load_document(&url).await;
    }

    /// Render every page at the current scale.
    ///
    /// Only one pass writes the slot list at a time; a request made while a
    /// pass runs is handled by the configured busy policy.
    pub async fn render_all(&self) {
        let ticket = self.gate.request();
        loop {
            match self.gate.admit(ticket) {
                Admission::Start(pass) => {
                    self.run_pass(pass).await;
                    return;
                }
                Admission::Dropped => {
                    warn!("Render pass already in progress, dropping request");
                    return;
                }
                Admission::Served => return,
                Admission::Wait => {
                    debug!("Render pass in progress, waiting for it to pick up the request");
                    self.gate.wait_idle().await;
                }
            }
        }
    }

    async fn run_pass(&self, pass: RenderPass<'_>) {
        'pass: loop {
            let generation = self.gate.generation();
            let Some(input) = self.pass_input() else {
                self.clear_slots();
                return;
            };
            self.clear_slots();

            let page_count = input.document.page_count();
            debug!(
                "Render pass over {page_count} pages at scale {:.2}",
                input.scale
            );

            for number in 1..=page_count {
                let fetched = input.document.page(number).await;
                match self.check_pass(generation, input.epoch) {
                    PassCheck::Current => {}
                    PassCheck::Restart => continue 'pass,
                    PassCheck::Abandon => return,
                }
                let page = match fetched {
                    Ok(page) => page,
                    Err(e) => {
                        error!("Error rendering page {number}: {e}");
                        continue;
                    }
                };

                let viewport = page.viewport(input.scale);
                let mut surface = self.container.borrow_mut().create_surface(viewport);
                let drawn = surface.draw_page(&page, viewport).await;
                match self.check_pass(generation, input.epoch) {
                    PassCheck::Current => {}
                    PassCheck::Restart => continue 'pass,
                    PassCheck::Abandon => return,
                }

                match drawn {
                    Ok(()) => {
                        debug!("Rendered page {number}");
                        self.slots
                            .borrow_mut()
                            .push(PageSlot::new(number, viewport, surface));
                    }
                    Err(e) => error!("Error rendering page {number}: {e}"),
                }
            }

            self.gate.mark_served(generation);
            break;
        }
        drop(pass);
        self.restore_position();
    }

    /// Bring the current page back into view once the slot list is rebuilt,
    /// then resync the page indicator with what is actually centered.
    fn restore_position(&self) {
        let page = self.current_page();
        let top = self
            .slot_boxes()
            .into_iter()
            .find(|slot| slot.page == page)
            .map(|slot| slot.top);
        if let Some(top) = top {
            let mut container = self.container.borrow_mut();
            if container.scroll_top() != top {
                container.scroll_to(top);
            }
        }
        self.handle_scroll();
    }

    fn pass_input(&self) -> Option<PassInput<O::Document>> {
        let document = self.document.borrow().clone()?;
        Some(PassInput {
            document,
            scale: self.scale(),
            epoch: self.epoch.get(),
        })
    }

    fn check_pass(&self, generation: u64, epoch: u64) -> PassCheck {
        let reloaded = self.epoch.get() != epoch;
        if self.gate.is_superseded(generation) || (reloaded && self.gate.policy().restarts()) {
            debug!("Render pass superseded, restarting");
            PassCheck::Restart
        } else if reloaded {
            debug!("Document replaced during render pass, abandoning it");
            PassCheck::Abandon
        } else {
            PassCheck::Current
        }
    }

    /// Redraw one existing slot in place at the current scale.
    ///
    /// No-op when the page is out of range, has no slot, or a render pass
    /// holds the slot list.
    pub async fn render_single_page(&self, page_num: u32) {
        if page_num < 1 || page_num > self.page_count() {
            return;
        }
        let Some(pass) = self.gate.try_acquire() else {
            debug!("Skipping refresh of page {page_num}: render pass in progress");
            return;
        };
        let Some(input) = self.pass_input() else {
            return;
        };
        let Some(index) = self.slot_index(page_num) else {
            return;
        };

        let page = match input.document.page(page_num).await {
            Ok(page) => page,
            Err(e) => {
                error!("Error rendering page {page_num}: {e}");
                return;
            }
        };
        if self.epoch.get() != input.epoch {
            return;
        }

        let viewport = page.viewport(input.scale);
        let checked_out = self
            .slots
            .borrow_mut()
            .get_mut(index)
            .filter(|slot| slot.page == page_num)
            .and_then(PageSlot::check_out);
        let Some(mut surface) = checked_out else {
            return;
        };
        surface.resize(viewport.width_px(), viewport.height_px());
        if let Err(e) = surface.draw_page(&page, viewport).await {
            error!("Error rendering page {page_num}: {e}");
        }

        if let Some(slot) = self.slots.borrow_mut().get_mut(index) {
            if slot.page == page_num {
                slot.check_in(viewport, surface);
            }
        }
        drop(pass);
    }

    fn slot_index(&self, page_num: u32) -> Option<usize> {
        self.slots
            .borrow()
            .iter()
            .position(|slot| slot.page == page_num)
    }

    pub async fn zoom_in(&self) {
        self.dispatch(Command::Zoom(ZoomStep::In)).await;
    }

    pub async fn zoom_out(&self) {
        self.dispatch(Command::Zoom(ZoomStep::Out)).await;
    }

    /// Scale so that page 1 fills the container width
    pub async fn zoom_fit(&self) {
        let Some(document) = self.document.borrow().clone() else {
            return;
        };
        let epoch = self.epoch.get();
        let page = match document.page(1).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Cannot fit to width: {e}");
                return;
            }
        };
        if self.epoch.get() != epoch {
            return;
        }

        let page_width = page.viewport(1.0).width;
        let container_width = self.container.borrow().client_width();
        let Some(scale) = fit_width_scale(container_width, self.config.fit_padding, page_width)
        else {
            return;
        };
        debug!("Fit to width: container {container_width}px, page {page_width}px -> {scale:.3}");
        self.dispatch(Command::SetScale(scale)).await;
    }

    pub fn prev_page(&self) {
        let _ = self.apply(Command::PrevPage);
    }

    pub fn next_page(&self) {
        let _ = self.apply(Command::NextPage);
    }

    /// Scroll to a page, clamped to the document
    pub fn go_to_page(&self, page: u32) {
        let _ = self.apply(Command::GoToPage(page));
    }

    /// Sync the current page with the slot nearest the container center
    pub fn handle_scroll(&self) {
        let boxes = self.slot_boxes();
        let (scroll_top, client_height) = {
            let container = self.container.borrow();
            (container.scroll_top(), container.client_height())
        };
        if let Some(page) = page_at_center(&boxes, scroll_top, client_height) {
            let _ = self.apply(Command::PageScrolledIntoView(page));
        }
    }

    /// Run the shortcut bound to `key`, if any; returns whether it was handled
    pub async fn handle_keyboard(&self, key: &KeyEvent, focus: FocusTarget) -> bool {
        let Some(action) = action_for_key(key, focus) else {
            return false;
        };
        self.perform(action).await;
        true
    }

    pub async fn perform(&self, action: ViewerAction) {
        match action {
            ViewerAction::PrevPage => self.prev_page(),
            ViewerAction::NextPage => self.next_page(),
            ViewerAction::Zoom(step) => self.dispatch(Command::Zoom(step)).await,
            ViewerAction::ZoomFit => self.zoom_fit().await,
        }
    }

    async fn dispatch(&self, cmd: Command) {
        if self.apply(cmd) {
            self.render_all().await;
        }
    }

    /// Apply a command and run its synchronous effects.
    ///
    /// Returns true when a full render pass was requested.
    fn apply(&self, cmd: Command) -> bool {
        let effects = self.view.borrow_mut().apply(cmd);
        let mut render = false;
        for effect in effects {
            match effect {
                Effect::ShowLoading => {
                    let mut chrome = self.chrome.borrow_mut();
                    chrome.hide_error();
                    chrome.show_loading();
                }
                Effect::HideLoading => self.chrome.borrow_mut().hide_loading(),
                Effect::ShowError(message) => {
                    let mut chrome = self.chrome.borrow_mut();
                    chrome.hide_loading();
                    chrome.show_error(&message);
                }
                Effect::ClearSlots => self.clear_slots(),
                Effect::RenderAll => render = true,
                Effect::ScrollToPage(page) => self.scroll_to_page(page),
                Effect::UpdatePageInfo => self.update_page_info(),
                Effect::UpdateZoomLabel => {
                    let label = self.zoom_label();
                    self.chrome.borrow_mut().set_zoom_label(&label);
                }
            }
        }
        render
    }

    fn clear_slots(&self) {
        self.slots.borrow_mut().clear();
        self.container.borrow_mut().clear();
    }

    fn scroll_to_page(&self, page: u32) {
        let target = self
            .slot_boxes()
            .into_iter()
            .find(|slot| slot.page == page);
        if let Some(slot) = target {
            self.container.borrow_mut().scroll_to(slot.top);
        }
    }

    fn update_page_info(&self) {
        let (current, total, prev, next) = {
            let view = self.view.borrow();
            (
                view.current_page,
                view.page_count,
                view.can_go_prev(),
                view.can_go_next(),
            )
        };
        let mut chrome = self.chrome.borrow_mut();
        chrome.set_page_info(current, total);
        chrome.set_nav_enabled(prev, next);
    }
}
