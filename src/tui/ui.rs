//! Status view: header with page and zoom, slot list, footer with keys

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, Wrap},
};

use super::TerminalViewer;
use super::notice::{Notice, NoticeLevel};
use crate::viewer::{DisplayContainer, DocumentOpener};

const HELP: &str = "C-PgUp/PgDn: Page | C-+/-: Zoom | C-0: Fit | j/k: Scroll | r: Retry | e: Export | q: Quit";

pub fn draw<O: DocumentOpener>(frame: &mut Frame, viewer: &TerminalViewer<O>, notice: Option<&Notice>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, viewer);

    let chrome = viewer.chrome();
    if let Some(message) = &chrome.error {
        let text = vec![
            Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press r to retry"),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().title("Error")),
            body,
        );
    } else if chrome.loading {
        frame.render_widget(
            Paragraph::new("Loading document...").block(Block::bordered()),
            body,
        );
    } else {
        draw_slots(frame, body, viewer);
    }

    let footer_line = match notice.filter(|n| !n.is_expired()) {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(notice.message.clone(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(footer_line), footer);
}

fn draw_header<O: DocumentOpener>(frame: &mut Frame, area: Rect, viewer: &TerminalViewer<O>) {
    let chrome = viewer.chrome();
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);

    let page_info = match chrome.page_info {
        Some((current, total)) => format!("Page {current} of {total}"),
        None => "No document".to_string(),
    };
    let mut spans = vec![
        Span::styled("◀ ", if chrome.prev_enabled { enabled } else { disabled }),
        Span::styled(page_info, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" ▶", if chrome.next_enabled { enabled } else { disabled }),
        Span::raw("   Zoom "),
        Span::styled(
            chrome.zoom_label.clone().unwrap_or_else(|| viewer.zoom_label()),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if viewer.is_rendering() {
        spans.push(Span::styled("   rendering…", Style::default().fg(Color::Yellow)));
    }

    let title = viewer.last_url().unwrap_or_else(|| "pageview".to_string());
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::bordered().title(title)),
        area,
    );
}

fn draw_slots<O: DocumentOpener>(frame: &mut Frame, area: Rect, viewer: &TerminalViewer<O>) {
    let boxes = viewer.slot_boxes();
    let (scroll_top, client_height) = {
        let container = viewer.container();
        (container.scroll_top(), container.client_height())
    };
    let visible_bottom = scroll_top + client_height;
    let current = viewer.current_page();

    let items: Vec<ListItem> = viewer.with_slots(|slots| {
        slots
            .iter()
            .zip(&boxes)
            .map(|(slot, slot_box)| {
                let visible =
                    slot_box.top < visible_bottom && slot_box.top + slot_box.height > scroll_top;
                let marker = if visible { "•" } else { " " };
                ListItem::new(format!(
                    "{marker} {:<10} {} x {} px",
                    slot.label,
                    slot.viewport.width_px(),
                    slot.viewport.height_px()
                ))
            })
            .collect()
    });

    let mut state = ListState::default().with_selected(boxes.iter().position(|b| b.page == current));
    let title = format!("{} of {} pages rendered", items.len(), viewer.page_count());
    let list = List::new(items)
        .block(Block::bordered().title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}
