//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use hlb_core::routing::{Route, RouteDecision};

use crate::app::{App, AppState, FormField, NAV_ITEMS};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match app.decision {
        // Nothing is interactive until the session is known
        RouteDecision::Pending | RouteDecision::Redirect { .. } => Ok(false),
        RouteDecision::Render(_) => handle_auth_input(app, key).await,
        RouteDecision::Shell(_) => handle_shell_input(app, key).await,
    }
}

/// Input on the landing, login and registration views
async fn handle_auth_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let register = app.is_register_view();

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::F(2) => {
            app.toggle_auth_view();
        }
        KeyCode::Down | KeyCode::Tab => {
            app.form.next_field(register);
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.form.prev_field(register);
        }
        KeyCode::Enter => match app.form.focus {
            FormField::Password | FormField::Submit => {
                app.submit_auth_form().await;
            }
            FormField::DisplayName | FormField::Email => {
                app.form.next_field(register);
            }
        },
        KeyCode::Backspace => {
            app.form.pop_char();
        }
        KeyCode::Char(c) => {
            app.form.push_char(c);
        }
        _ => {}
    }
    Ok(false)
}

/// Input inside the authenticated shell
async fn handle_shell_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.nav_selection = (app.nav_selection + NAV_ITEMS.len() - 1) % NAV_ITEMS.len();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.nav_selection = (app.nav_selection + 1) % NAV_ITEMS.len();
        }
        KeyCode::Enter => {
            if let Some(item) = NAV_ITEMS.get(app.nav_selection) {
                app.navigate(item.path());
            }
        }
        KeyCode::Char(c @ '1'..='7') => {
            let index = c as usize - '1' as usize;
            if let Some(item) = NAV_ITEMS.get(index) {
                app.navigate(item.path());
            }
        }
        KeyCode::Char('p') => {
            app.navigate(&Route::Profile.path());
        }
        KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => {
            app.go_back();
        }
        KeyCode::Char('r') => {
            app.refresh_profile().await;
            app.request_notification_poll();
        }
        KeyCode::Char('L') => {
            app.logout();
        }
        _ => {}
    }
    Ok(false)
}
