//! Application event handling.
//!
//! This module processes background task completion events (fetch,
//! bookmark, and submit results) and feeds them into the panel reducers.

use crate::app::{App, AppEvent};
use crate::news::FETCH_ERROR_MESSAGE;

pub(super) const BOOKMARK_SAVED_MESSAGE: &str = "Bookmark saved successfully!";
pub(super) const BOOKMARK_ERROR_MESSAGE: &str = "Error saving bookmark. Please try again later.";

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::NewsFetched { seq, result } => {
            let failed = result.is_err();
            // The panel enforces the sequence guard; a stale result changes
            // nothing, including the status line.
            if app.news.apply_fetch(seq, result) {
                if failed {
                    app.set_status(FETCH_ERROR_MESSAGE);
                } else {
                    app.set_status(format!("Loaded {} articles", app.news.articles.len()));
                }
            }
        }

        AppEvent::BookmarkSaved { article_id, result } => {
            app.pending_bookmarks.remove(&article_id);
            match result {
                Ok(()) => {
                    app.news.mark_bookmarked(article_id);
                    app.set_status(BOOKMARK_SAVED_MESSAGE);
                }
                Err(e) => {
                    tracing::warn!(article_id = article_id, error = %e, "Bookmark save failed");
                    app.set_status(BOOKMARK_ERROR_MESSAGE);
                }
            }
        }

        AppEvent::SubmitCompleted { result } => {
            app.auth.apply_submit(result);
        }
    }
}
