//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes. Forms
//! take printable characters as text, so screen shortcuts on form screens use
//! Ctrl or function keys.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use plandesk_core::Route;

use crate::app::{App, AppState};
use crate::forms::{FieldCycle, LoginField, ProfileField, RegisterField};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
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

    if key.code == KeyCode::F(1) {
        app.state = AppState::ShowingHelp;
        return Ok(false);
    }

    match app.route {
        Route::Login => handle_login_input(app, key).await,
        Route::Register => handle_register_input(app, key).await,
        Route::Profile if app.profile.editing => handle_profile_edit_input(app, key).await,
        Route::Profile => handle_profile_input(app, key).await,
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.navigate(Route::Register).await;
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Down | KeyCode::Tab => app.login.focus = app.login.focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.login.focus = app.login.focus.prev(),
        KeyCode::Enter => match app.login.focus {
            LoginField::Submit => app.attempt_login().await,
            // Enter on the password field submits
            LoginField::Password => {
                app.login.focus = LoginField::Submit;
                app.attempt_login().await;
            }
            LoginField::Email => app.login.focus = LoginField::Password,
        },
        KeyCode::Backspace => app.login.pop_char(),
        KeyCode::Char(c) => app.login.push_char(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => app.navigate(Route::Login).await,
        KeyCode::Down | KeyCode::Tab => app.register.focus = app.register.focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.register.focus = app.register.focus.prev(),
        KeyCode::Enter => {
            if app.register.focus == RegisterField::Submit {
                app.attempt_register().await;
            } else {
                app.register.focus = app.register.focus.next();
            }
        }
        KeyCode::Backspace => app.register.pop_char(),
        KeyCode::Char(c) => app.register.push_char(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_profile_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('e') => {
            if app.profile.user.is_some() {
                app.profile.toggle_edit();
            }
        }
        KeyCode::Char('r') => {
            app.profile.clear_feedback();
            app.load_profile().await;
        }
        KeyCode::Char('l') => app.logout().await,
        _ => {}
    }
    Ok(false)
}

async fn handle_profile_edit_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.save_profile().await;
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => app.profile.toggle_edit(),
        KeyCode::Down | KeyCode::Tab => app.profile.focus = app.profile.focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.profile.focus = app.profile.focus.prev(),
        KeyCode::Enter => {
            if app.profile.focus == ProfileField::Save {
                app.save_profile().await;
            } else {
                app.profile.focus = app.profile.focus.next();
            }
        }
        KeyCode::Backspace => app.profile.pop_char(),
        KeyCode::Char(c) => app.profile.push_char(c),
        _ => {}
    }
    Ok(false)
}
