//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on panel focus. While the account form has focus,
//! printable characters belong to the form, so global shortcuts there are
//! limited to keys that cannot collide with typing.

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, PanelFocus};
use crate::auth::{FormField, Session};
use crate::util::validate_link;

use super::helpers::{spawn_bookmark, spawn_fetch, spawn_submit};
use super::Action;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on the help overlay and
/// current panel focus.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        if matches!(
            code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    // Panel switching works everywhere
    if code == KeyCode::Tab {
        app.cycle_focus();
        return Action::Continue;
    }

    match app.focus {
        PanelFocus::News => handle_news_input(app, code, event_tx),
        PanelFocus::Account => handle_account_input(app, code, modifiers, event_tx),
    }
}

/// Handle input while the news panel has focus.
fn handle_news_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('j') | KeyCode::Down => app.news.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.news.nav_up(),
        KeyCode::Char('h') | KeyCode::Left => app.news.prev_tab(),
        KeyCode::Char('l') | KeyCode::Right => app.news.next_tab(),

        // Direct tab selection: 1-9
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.news.select_tab(index);
        }

        // Manual refresh, the only re-fetch trigger
        KeyCode::Char('r') => {
            app.set_status("Refreshing articles...");
            spawn_fetch(app, event_tx);
        }

        KeyCode::Char('b') => {
            if let Some(article) = app.news.selected_visible_article().cloned() {
                spawn_bookmark(app, article, event_tx);
            } else {
                app.set_status("No article selected");
            }
        }

        KeyCode::Char('o') | KeyCode::Enter => open_selected_article(app),

        _ => {}
    }
    Action::Continue
}

/// Open the selected article's link with the system handler.
fn open_selected_article(app: &mut App) {
    let Some(article) = app.news.selected_visible_article() else {
        app.set_status("No article selected");
        return;
    };
    let Some(url) = article.url.as_deref() else {
        app.set_status("Article has no link");
        return;
    };

    match validate_link(url) {
        Ok(valid) => {
            if let Err(e) = open::that(valid.as_str()) {
                tracing::warn!(url = %valid, error = %e, "Failed to open article link");
                app.set_status("Failed to open link");
            } else {
                app.set_status("Opened in browser");
            }
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Refusing to open invalid article link");
            app.set_status("Article link is not a valid http(s) URL");
        }
    }
}

/// Handle input while the account panel has focus.
///
/// Logged out, the form owns printable characters; mode switching uses
/// Ctrl+S so usernames containing 'm' or 's' stay typeable. Logged in
/// there is no text entry, so plain letter shortcuts come back.
fn handle_account_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.auth.session == Session::LoggedIn {
        match code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Esc => app.focus = PanelFocus::News,
            KeyCode::Char('?') => app.show_help = true,
            KeyCode::Char('l') => {
                app.auth.logout();
                app.set_status("Logged out");
            }
            _ => {}
        }
        return Action::Continue;
    }

    // Logged out: form editing
    match code {
        KeyCode::Esc => app.focus = PanelFocus::News,
        KeyCode::Enter => spawn_submit(app, event_tx),
        KeyCode::Down => app.auth.next_field(),
        KeyCode::Up => app.auth.prev_field(),
        KeyCode::Backspace => app.auth.backspace(),

        // Switch login <-> signup (resets the form)
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.auth.toggle_mode();
        }

        // Space toggles the focused preference checkbox; elsewhere it types.
        KeyCode::Char(' ') => {
            if let FormField::Preference(i) = app.auth.focus {
                if let Some(option) = app.auth.options().get(i).cloned() {
                    app.auth.toggle_preference(&option);
                }
            } else {
                app.auth.push_char(' ');
            }
        }

        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.auth.push_char(c);
        }

        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Article;
    use crate::auth::AuthMode;
    use crate::config::Config;

    fn test_app() -> App {
        App::new(&Config::default()).unwrap()
    }

    fn key(app: &mut App, code: KeyCode) -> Action {
        let (tx, _rx) = mpsc::channel(8);
        handle_input(app, code, KeyModifiers::NONE, &tx)
    }

    fn ctrl_key(app: &mut App, c: char) -> Action {
        let (tx, _rx) = mpsc::channel(8);
        handle_input(app, KeyCode::Char(c), KeyModifiers::CONTROL, &tx)
    }

    #[tokio::test]
    async fn test_q_quits_from_news_panel() {
        let mut app = test_app();
        assert!(matches!(key(&mut app, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_tab_cycles_panel_focus() {
        let mut app = test_app();
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, PanelFocus::Account);
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, PanelFocus::News);
    }

    #[tokio::test]
    async fn test_typing_q_into_username_does_not_quit() {
        let mut app = test_app();
        app.focus = PanelFocus::Account;

        let action = key(&mut app, KeyCode::Char('q'));
        assert!(matches!(action, Action::Continue));
        assert_eq!(app.auth.form.username, "q");
    }

    #[tokio::test]
    async fn test_ctrl_s_toggles_mode_and_resets_form() {
        let mut app = test_app();
        app.focus = PanelFocus::Account;
        key(&mut app, KeyCode::Char('a'));

        ctrl_key(&mut app, 's');

        assert_eq!(app.auth.mode, AuthMode::Signup);
        assert!(app.auth.form.username.is_empty());
    }

    #[tokio::test]
    async fn test_space_toggles_focused_preference_in_signup() {
        let mut app = test_app();
        app.focus = PanelFocus::Account;
        ctrl_key(&mut app, 's'); // -> Signup
        key(&mut app, KeyCode::Down); // -> Password
        key(&mut app, KeyCode::Down); // -> Preference(0)
        assert_eq!(app.auth.focus, FormField::Preference(0));

        let first = app.auth.options()[0].clone();
        assert!(app.auth.form.preferences.contains(&first));
        key(&mut app, KeyCode::Char(' '));
        assert!(!app.auth.form.preferences.contains(&first));
    }

    #[tokio::test]
    async fn test_space_types_into_password() {
        let mut app = test_app();
        app.focus = PanelFocus::Account;
        key(&mut app, KeyCode::Down); // -> Password
        key(&mut app, KeyCode::Char('a'));
        key(&mut app, KeyCode::Char(' '));
        key(&mut app, KeyCode::Char('b'));
        assert_eq!(app.auth.form.password, "a b");
    }

    #[tokio::test]
    async fn test_category_number_keys_select_tab() {
        let mut app = test_app();
        let seq = app.news.begin_fetch();
        app.news.apply_fetch(
            seq,
            Ok(vec![Article {
                id: 1,
                title: "T".to_string(),
                url: None,
                image_url: Some("x".to_string()),
                category: Some("science".to_string()),
                published_at: None,
            }]),
        );

        key(&mut app, KeyCode::Char('5'));
        assert_eq!(app.news.current_tab(), Some("science"));
    }

    #[tokio::test]
    async fn test_logout_key_when_logged_in() {
        let mut app = test_app();
        app.focus = PanelFocus::Account;
        app.auth.begin_submit().unwrap();
        app.auth.apply_submit(Ok(()));

        key(&mut app, KeyCode::Char('l'));
        assert_eq!(app.auth.session, Session::LoggedOut);
    }
}
