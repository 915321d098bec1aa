//! newsdeck: a terminal client for a personalized news aggregator.
//!
//! The service side lives elsewhere; this crate is a thin, stateful client
//! over four HTTP calls: fetching a categorized article list, saving
//! bookmarks, and logging in / registering. The interesting parts are the
//! two panel state machines:
//!
//! - [`news::NewsPanel`]: fetch, group by category, tabbed browsing,
//!   session bookmarks, and a sequence guard that keeps overlapping
//!   refreshes from applying stale results.
//! - [`auth::AuthPanel`]: the login/signup form and session lifecycle.
//!
//! Both are pure reducers, fully testable without a terminal or network;
//! [`ui`] wires them to ratatui and the event loop, [`api`] to the remote
//! service.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod news;
pub mod ui;
pub mod util;
