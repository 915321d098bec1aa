use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, PanelFocus};
use crate::util::{strip_control_chars, truncate_to_width};

/// Format an epoch-milliseconds timestamp as relative time.
pub(super) fn format_relative_time(timestamp_ms: Option<i64>) -> String {
    let Some(ms) = timestamp_ms else {
        return String::new();
    };
    let ts = ms / 1000;

    let now = Utc::now().timestamp();
    let diff = now - ts;

    // Future dates (malformed data)
    if diff < 0 {
        return "now".to_string();
    }

    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Render the article list for the selected category tab.
///
/// Only articles carrying an image render (the rest stay in the bucket but
/// are skipped); a fetch error shows in place of an empty list, and prior
/// articles keep rendering through a failed refresh.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let is_focused = app.focus == PanelFocus::News;
    let visible = app.news.visible_articles();

    let bucket_total = app
        .news
        .current_bucket()
        .map(|b| b.articles.len())
        .unwrap_or(0);
    let title = format!("Articles ({}/{})", visible.len(), bucket_total);

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    if visible.is_empty() {
        let text = if let Some(error) = &app.news.error {
            Span::styled(error.clone(), Style::default().fg(Color::Red))
        } else if app.news.in_flight {
            Span::styled("Loading articles...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled("No articles", Style::default().fg(Color::DarkGray))
        };
        f.render_widget(Paragraph::new(Line::from(text)).block(block), area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let time_str = format_relative_time(article.published_at);
            let mut spans = Vec::new();

            // Bookmark indicator: saved, or save in flight
            if app.news.bookmarks.contains(article.id) {
                spans.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
            } else if app.pending_bookmarks.contains(&article.id) {
                spans.push(Span::styled("… ", Style::default().fg(Color::DarkGray)));
            }

            let title_style = if i == app.news.selected_article && is_focused {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if i == app.news.selected_article {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            // Leave room for borders, indicator, and the time column
            let max_title_width = (area.width as usize).saturating_sub(12);
            let clean = strip_control_chars(&article.title);
            let title = truncate_to_width(&clean, max_title_width).into_owned();
            spans.push(Span::styled(title, title_style));

            if !time_str.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", time_str),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_time_none_is_empty() {
        assert_eq!(format_relative_time(None), "");
    }

    #[test]
    fn test_relative_time_future_is_now() {
        let future_ms = (Utc::now().timestamp() + 600) * 1000;
        assert_eq!(format_relative_time(Some(future_ms)), "now");
    }

    #[test]
    fn test_relative_time_minutes_and_hours() {
        let now = Utc::now().timestamp();
        assert_eq!(format_relative_time(Some((now - 120) * 1000)), "2m");
        assert_eq!(format_relative_time(Some((now - 7200) * 1000)), "2h");
        assert_eq!(format_relative_time(Some((now - 172800) * 1000)), "2d");
    }
}
