//! Central application state.
//!
//! `App` composes the two panels with the cross-cutting UI state: which
//! panel has focus, the transient status line, and the set of bookmark
//! saves currently in flight. Background tasks report completions as
//! [`AppEvent`]s over the UI loop's channel; the `ui` event handlers feed
//! them into the panel reducers.

use std::borrow::Cow;
use std::collections::HashSet;

use anyhow::Result;
use tokio::time::Instant;

use crate::api::{ApiClient, ApiError, Article, ArticleId};
use crate::auth::AuthPanel;
use crate::config::Config;
use crate::news::NewsPanel;

// ============================================================================
// Focus and Events
// ============================================================================

/// Which panel receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    News,
    Account,
}

/// Events from background tasks.
pub enum AppEvent {
    /// A news fetch resolved.
    ///
    /// `seq` is the sequence number issued by `NewsPanel::begin_fetch`;
    /// the panel discards results that are not from the latest fetch.
    NewsFetched {
        seq: u64,
        result: Result<Vec<Article>, ApiError>,
    },
    /// A bookmark save resolved.
    BookmarkSaved {
        article_id: ArticleId,
        result: Result<(), ApiError>,
    },
    /// A login/register submit resolved.
    SubmitCompleted { result: Result<(), ApiError> },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
pub struct App {
    pub client: ApiClient,
    /// User identifier attached to bookmark saves.
    pub user_id: String,
    pub news: NewsPanel,
    pub auth: AuthPanel,
    pub focus: PanelFocus,

    /// Status message with expiry — Cow avoids allocation for static
    /// literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,

    /// Article ids with a bookmark save in flight, so a second keypress
    /// cannot fire a duplicate request before the first resolves.
    pub pending_bookmarks: HashSet<ArticleId>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ApiClient::new(
            &config.news_api_url,
            &config.auth_api_url,
            config.request_timeout_secs,
        )?;

        Ok(Self {
            client,
            user_id: config.user_id.clone(),
            news: NewsPanel::new(config.categories.clone()),
            auth: AuthPanel::new(config.categories.clone()),
            focus: PanelFocus::News,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            pending_bookmarks: HashSet::new(),
        })
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds).
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Toggle keyboard focus between the two panels.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::News => PanelFocus::Account,
            PanelFocus::Account => PanelFocus::News,
        };
    }
}

// ============================================================================
// Tests
// ============================================================================
