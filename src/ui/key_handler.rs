//! Key resolution separated from execution.
//!
//! `resolve_key` reads AppState and returns a KeyAction; the App applies it
//! and starts a fetch-flow when the action yields a ticket.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::state::AppState;

/// Action to execute for one key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Stop the application
    Quit,
    /// Open or close the help popup
    ToggleHelp,
    /// Close the help popup
    CloseHelp,
    /// Submit the entry form
    Submit,
    /// Re-run the fetch-flow for the loaded card
    Refresh,
    /// Show the entry form again
    ReturnToInput,
    /// Insert a character into the entry form
    InsertChar(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
}

/// Decide what a key press does in the current state
pub fn resolve_key(state: &AppState, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    // Help popup swallows everything
    if state.show_help {
        return KeyAction::CloseHelp;
    }

    // Global keys
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => KeyAction::Quit,
            KeyCode::Char('r') => KeyAction::Refresh,
            _ => KeyAction::None,
        };
    }
    match code {
        KeyCode::F(1) => return KeyAction::ToggleHelp,
        KeyCode::F(5) => return KeyAction::Refresh,
        _ => {}
    }

    if state.is_input_mode() {
        resolve_input_mode_key(state, code)
    } else {
        resolve_view_mode_key(code)
    }
}

/// Keys while the entry form is shown
fn resolve_input_mode_key(state: &AppState, code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Enter => KeyAction::Submit,
        // The form is read-only while a fetch-flow is in flight
        _ if state.is_loading() => KeyAction::None,
        KeyCode::Char(c) => KeyAction::InsertChar(c),
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Delete => KeyAction::Delete,
        KeyCode::Left => KeyAction::CursorLeft,
        KeyCode::Right => KeyAction::CursorRight,
        KeyCode::Home => KeyAction::CursorHome,
        KeyCode::End => KeyAction::CursorEnd,
        _ => KeyAction::None,
    }
}

/// Keys while the record view has focus
fn resolve_view_mode_key(code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char('e') | KeyCode::Char('i') => KeyAction::ReturnToInput,
        KeyCode::Char('?') => KeyAction::ToggleHelp,
        _ => KeyAction::None,
    }
}
