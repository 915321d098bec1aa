//! Help overlay: key reference rendered on top of the current view.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("Tab", "Switch between news and account panels"),
    ("q / Esc", "Quit (news panel)"),
    ("", ""),
    ("h / l, ←/→", "Previous / next category"),
    ("1-9", "Jump to category"),
    ("j / k, ↑/↓", "Select article"),
    ("r", "Refresh articles"),
    ("b", "Bookmark selected article"),
    ("o / Enter", "Open selected article in browser"),
    ("", ""),
    ("Up / Down", "Move between form fields"),
    ("Space", "Toggle focused preference"),
    ("Enter", "Submit login / signup"),
    ("Ctrl+S", "Switch login <-> signup"),
    ("l", "Log out (when logged in)"),
];

/// Render the help overlay centered on the given area.
pub(super) fn render(f: &mut Frame, area: Rect) {
    let width = 56.min(area.width.saturating_sub(4));
    let height = (HELP_ENTRIES.len() as u16 + 4).min(area.height.saturating_sub(2));
    if width < 10 || height < 5 {
        return;
    }

    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let mut lines: Vec<Line> = HELP_ENTRIES
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<12}", key),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*desc),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press Esc, q, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default().borders(Borders::ALL).title("Help");

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
