//! Keyboard shortcuts for the page view

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::zoom::ZoomStep;

/// Where keyboard focus currently is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FocusTarget {
    /// The document view or any non-editable element
    #[default]
    Viewer,
    /// A text field; shortcuts must not steal its keystrokes
    TextInput,
}

/// High-level viewer action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerAction {
    PrevPage,
    NextPage,
    Zoom(ZoomStep),
    ZoomFit,
}

/// Map a key press to a viewer action.
///
/// Every shortcut needs Ctrl; nothing is mapped while a text input has focus.
#[must_use]
pub fn action_for_key(key: &KeyEvent, focus: FocusTarget) -> Option<ViewerAction> {
    if focus == FocusTarget::TextInput || key.kind == KeyEventKind::Release {
        return None;
    }
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::PageUp | KeyCode::Up => Some(ViewerAction::PrevPage),
        KeyCode::PageDown | KeyCode::Down => Some(ViewerAction::NextPage),
        KeyCode::Char('+' | '=') => Some(ViewerAction::Zoom(ZoomStep::In)),
        KeyCode::Char('-') => Some(ViewerAction::Zoom(ZoomStep::Out)),
        KeyCode::Char('0') => Some(ViewerAction::ZoomFit),
        _ => None,
    }
}
