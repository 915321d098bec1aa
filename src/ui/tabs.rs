use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::app::{App, PanelFocus};
use crate::util::strip_control_chars;

/// Render the category tab strip.
///
/// Tab names come partly from remote data (extra buckets), so they are
/// sanitized and capitalized for display the way the category pills were.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let is_focused = app.focus == PanelFocus::News;

    let titles: Vec<Line> = app
        .news
        .tabs()
        .iter()
        .map(|name| Line::from(capitalize(&strip_control_chars(name))))
        .collect();

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let widget = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("News"),
        )
        .select(app.news.selected_tab)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");

    f.render_widget(widget, area);
}

/// Uppercase the first character, matching the original category labels
/// ("business" -> "Business").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
