use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

use crate::app::{App, PanelFocus};
use crate::auth::Session;

/// Render the status bar
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Use Cow to avoid allocations for static strings and borrowed messages
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.news.in_flight {
        Cow::Borrowed("Refreshing articles...")
    } else {
        // Static keybinding hints - zero allocation
        match (app.focus, app.auth.session) {
            (PanelFocus::News, _) => Cow::Borrowed(
                "[r]efresh [h/l]category [j/k]article [b]ookmark [o]pen [Tab]account [?]help [q]uit",
            ),
            (PanelFocus::Account, Session::LoggedOut) => Cow::Borrowed(
                "[Enter]submit [Ctrl+S]mode [Up/Down]fields [Space]toggle [Tab]news [Esc]back",
            ),
            (PanelFocus::Account, Session::LoggedIn) => {
                Cow::Borrowed("[l]ogout [Tab]news [?]help [q]uit")
            }
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
