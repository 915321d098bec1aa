//! Background task spawning for UI operations.
//!
//! All network work runs in detached tokio tasks that report back through
//! the `AppEvent` channel. Nothing here blocks the event loop; send
//! failures only mean the receiver is gone (shutdown), so they are logged
//! and dropped.

use tokio::sync::mpsc;

use crate::api::Article;
use crate::app::{App, AppEvent};
use crate::auth::AuthMode;
use crate::news::fetch_window_start_ms;

/// Spawn a news fetch for the last-day window.
///
/// Registers the fetch with the panel's sequence guard first; the spawned
/// task carries the sequence number back so stale completions can be
/// discarded. Deliberately no cancellation of earlier fetches; the guard
/// makes their results harmless.
pub(super) fn spawn_fetch(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let seq = app.news.begin_fetch();
    let client = app.client.clone();
    let tx = event_tx.clone();

    tracing::debug!(seq = seq, "Spawning article fetch");

    tokio::spawn(async move {
        let result = client.fetch_articles(fetch_window_start_ms()).await;
        let event = AppEvent::NewsFetched { seq, result };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send fetch result (receiver dropped)");
        }
    });
}

/// Spawn a bookmark save for the given article.
///
/// Articles already bookmarked, or with a save in flight, are skipped with
/// a status note instead of a duplicate request.
pub(super) fn spawn_bookmark(app: &mut App, article: Article, event_tx: &mpsc::Sender<AppEvent>) {
    let article_id = article.id;

    if app.news.bookmarks.contains(article_id) {
        app.set_status("Already bookmarked");
        return;
    }
    if !app.pending_bookmarks.insert(article_id) {
        app.set_status("Bookmark save already in progress");
        return;
    }

    let client = app.client.clone();
    let user_id = app.user_id.clone();
    let tx = event_tx.clone();

    tracing::debug!(article_id = article_id, "Spawning bookmark save");

    tokio::spawn(async move {
        let result = client.save_bookmark(&user_id, &article).await;
        let event = AppEvent::BookmarkSaved { article_id, result };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send bookmark result (receiver dropped)");
        }
    });
}

/// Spawn a login/register submit with the current form contents.
///
/// A no-op when a submit is already in flight or the session is logged in
/// (`begin_submit` returns `None` for both).
pub(super) fn spawn_submit(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(credentials) = app.auth.begin_submit() else {
        return;
    };
    let mode = app.auth.mode;
    let client = app.client.clone();
    let tx = event_tx.clone();

    tracing::debug!(username = %credentials.username, ?mode, "Spawning auth submit");

    tokio::spawn(async move {
        let result = match mode {
            AuthMode::Login => client.login(&credentials).await,
            AuthMode::Signup => client.register(&credentials).await,
        };
        let event = AppEvent::SubmitCompleted { result };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send submit result (receiver dropped)");
        }
    });
}
