//! Terminal host for the page viewer
//!
//! Pixels are not shown; the terminal displays the viewer's status and the
//! slot list, and forwards keys to the controller. Rendered pages can be
//! exported as PNG files.

mod container;
mod events;
mod notice;
mod ui;

pub use container::{StatusChrome, TerminalContainer};
pub use events::{EventSource, KeyboardEventSource, SimulatedEventSource};
pub use notice::{Notice, NoticeLevel};
pub use ui::draw;

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error, info};
use ratatui::{Terminal, backend::Backend};

use crate::settings::Settings;
use crate::viewer::{
    DocumentOpener, FocusTarget, PageViewerController, ViewerError, action_for_key,
};

pub type TerminalViewer<O> = PageViewerController<O, TerminalContainer, StatusChrome>;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MAX_EVENTS_PER_FRAME: usize = 50;

pub fn terminal_viewer<O: DocumentOpener>(opener: O, settings: &Settings) -> TerminalViewer<O> {
    PageViewerController::new(
        opener,
        TerminalContainer::new(settings.viewport_width_px, settings.viewport_height_px),
        StatusChrome::default(),
        settings.viewer_config(),
    )
}

#[derive(Debug, Clone)]
pub struct HostOptions {
    pub url: String,
    pub scroll_step: f32,
    pub export_dir: PathBuf,
}

/// What the host does with one terminal event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCommand {
    Quit,
    /// Scroll the container by this many pixels
    Scroll(f32),
    Retry,
    Export,
    /// A viewer shortcut, handed to the controller
    Viewer(KeyEvent),
    Ignore,
}

pub fn route_event(event: &Event, scroll_step: f32) -> HostCommand {
    let Event::Key(key) = event else {
        return HostCommand::Ignore;
    };
    if key.kind == KeyEventKind::Release {
        return HostCommand::Ignore;
    }
    if action_for_key(key, FocusTarget::Viewer).is_some() {
        return HostCommand::Viewer(*key);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => HostCommand::Quit,
            _ => HostCommand::Ignore,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => HostCommand::Quit,
        KeyCode::Char('j') | KeyCode::Down => HostCommand::Scroll(scroll_step),
        KeyCode::Char('k') | KeyCode::Up => HostCommand::Scroll(-scroll_step),
        KeyCode::Char('r') => HostCommand::Retry,
        KeyCode::Char('e') => HostCommand::Export,
        _ => HostCommand::Ignore,
    }
}

/// Scroll the container as a user would and resync the current page
pub fn user_scroll<O: DocumentOpener>(viewer: &TerminalViewer<O>, delta: f32) {
    let content_height = viewer
        .slot_boxes()
        .last()
        .map(|slot| slot.top + slot.height)
        .unwrap_or(0.0);
    viewer.container_mut().scroll_by(delta, content_height);
    viewer.handle_scroll();
}

/// Write every drawn slot to `dir` as `page-N.png`; returns how many were written
pub fn export_slots<O: DocumentOpener>(
    viewer: &TerminalViewer<O>,
    dir: &Path,
) -> Result<usize, ViewerError> {
    fs::create_dir_all(dir)
        .map_err(|e| ViewerError::backend(format!("cannot create {}: {e}", dir.display())))?;

    viewer.with_slots(|slots| -> Result<usize, ViewerError> {
        let mut written = 0;
        for slot in slots {
            let Some(surface) = slot.surface().filter(|s| s.raster().is_some()) else {
                debug!("Skipping export of page {}: not drawn", slot.page);
                continue;
            };
            let path = dir.join(format!("page-{}.png", slot.page));
            surface.save_png(&path)?;
            written += 1;
        }
        Ok(written)
    })
}

/// Load `url`, render it and export the result without a terminal
pub async fn export_document<O: DocumentOpener>(
    viewer: &TerminalViewer<O>,
    url: &str,
    dir: &Path,
) -> Result<usize> {
    viewer.load_document(url).await;
    if let Some(message) = viewer.chrome().error.clone() {
        anyhow::bail!("{message}");
    }
    let written = export_slots(viewer, dir)?;
    info!("Exported {written} pages to {}", dir.display());
    Ok(written)
}

/// Run the host loop until the user quits.
///
/// Must be called inside a `tokio::task::LocalSet`: loads, retries and
/// shortcuts run as local tasks so the loop keeps drawing while pages
/// render.
pub async fn run_with_event_source<B, O>(
    terminal: &mut Terminal<B>,
    viewer: Rc<TerminalViewer<O>>,
    event_source: &mut dyn EventSource,
    options: &HostOptions,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
    O: DocumentOpener + 'static,
{
    let mut notice: Option<Notice> = None;

    {
        let viewer = Rc::clone(&viewer);
        let url = options.url.clone();
        tokio::task::spawn_local(async move { viewer.load_document(&url).await });
    }

    loop {
        terminal.draw(|f| draw(f, &viewer, notice.as_ref()))?;

        let mut events_processed = 0;
        while events_processed < MAX_EVENTS_PER_FRAME && event_source.poll(Duration::ZERO)? {
            let event = event_source.read()?;
            events_processed += 1;

            match route_event(&event, options.scroll_step) {
                HostCommand::Quit => {
                    info!("Quit requested");
                    return Ok(());
                }
                HostCommand::Scroll(delta) => user_scroll(&viewer, delta),
                HostCommand::Retry => {
                    let viewer = Rc::clone(&viewer);
                    tokio::task::spawn_local(async move { viewer.retry().await });
                }
                HostCommand::Export => {
                    notice = Some(match export_slots(&viewer, &options.export_dir) {
                        Ok(written) => Notice::info(format!(
                            "Exported {written} pages to {}",
                            options.export_dir.display()
                        )),
                        Err(e) => {
                            error!("Export failed: {e}");
                            Notice::error(format!("Export failed: {e}"))
                        }
                    });
                }
                HostCommand::Viewer(key) => {
                    let viewer = Rc::clone(&viewer);
                    tokio::task::spawn_local(async move {
                        viewer.handle_keyboard(&key, FocusTarget::Viewer).await;
                    });
                }
                HostCommand::Ignore => {}
            }
        }

        if notice.as_ref().is_some_and(Notice::is_expired) {
            notice = None;
        }
        tokio::time::sleep(FRAME_INTERVAL).await;
    }
}
