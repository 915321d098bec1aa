use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, PanelFocus};
use crate::auth::{AuthMode, FormField, Session};
use crate::util::{strip_control_chars, truncate_to_width};

/// Render the account panel: the login/signup form while logged out, the
/// session's bookmarked articles once logged in.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    match app.auth.session {
        Session::LoggedOut => render_form(f, app, area),
        Session::LoggedIn => render_bookmarks(f, app, area),
    }
}

fn field_style(focused: bool, panel_focused: bool) -> Style {
    if focused && panel_focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let panel_focused = app.focus == PanelFocus::Account;
    let auth = &app.auth;

    let border_style = if panel_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(auth.mode.title());

    let mut lines: Vec<Line> = Vec::new();

    // Username
    lines.push(Line::from(vec![
        Span::styled(
            "Username: ",
            field_style(auth.focus == FormField::Username, panel_focused),
        ),
        Span::raw(auth.form.username.clone()),
        cursor_span(auth.focus == FormField::Username, panel_focused),
    ]));

    // Password, masked
    lines.push(Line::from(vec![
        Span::styled(
            "Password: ",
            field_style(auth.focus == FormField::Password, panel_focused),
        ),
        Span::raw("•".repeat(auth.form.password.chars().count())),
        cursor_span(auth.focus == FormField::Password, panel_focused),
    ]));

    // Preference checkboxes, signup only
    if auth.mode == AuthMode::Signup {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Preferences:",
            Style::default().fg(Color::DarkGray),
        )));
        for (i, option) in auth.options().iter().enumerate() {
            let checked = auth.form.preferences.contains(option);
            let marker = if checked { "[x] " } else { "[ ] " };
            lines.push(Line::from(Span::styled(
                format!("  {}{}", marker, option),
                field_style(auth.focus == FormField::Preference(i), panel_focused),
            )));
        }
    }

    // Submit control with in-flight label
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[ {} ]", auth.submit_label()),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    // Submit outcome
    if let Some(status) = &auth.status {
        let color = if status.success {
            Color::Green
        } else {
            Color::Red
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.message.clone(),
            Style::default().fg(color),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Ctrl+S switches between login and signup",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_bookmarks(f: &mut Frame, app: &App, area: Rect) {
    let panel_focused = app.focus == PanelFocus::Account;
    let bookmarked = app.news.bookmarked_articles();

    let border_style = if panel_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!("Bookmarked News ({})", bookmarked.len()));

    let mut lines: Vec<Line> = Vec::new();

    if let Some(status) = &app.auth.status {
        if status.success {
            lines.push(Line::from(Span::styled(
                status.message.clone(),
                Style::default().fg(Color::Green),
            )));
            lines.push(Line::from(""));
        }
    }

    if bookmarked.is_empty() {
        lines.push(Line::from(Span::styled(
            "No bookmarks yet. Press b on an article",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let max_width = (area.width as usize).saturating_sub(6);
        for article in bookmarked {
            let clean = strip_control_chars(&article.title);
            lines.push(Line::from(vec![
                Span::styled("★ ", Style::default().fg(Color::Yellow)),
                Span::raw(truncate_to_width(&clean, max_width).into_owned()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "l logs out",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Trailing cursor marker on the focused text field.
fn cursor_span(focused: bool, panel_focused: bool) -> Span<'static> {
    if focused && panel_focused {
        Span::styled("▏", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    }
}
