//! Remote service integration.
//!
//! The aggregator exposes two HTTP surfaces: a news API serving article
//! lists and an auth API handling login, registration, and bookmark saves.
//! This module provides the wire types ([`types`]) and a typed async client
//! ([`client`]) over both.

mod client;
mod types;

pub use client::{ApiClient, ApiError};
pub(crate) use client::DEFAULT_TIMEOUT_SECS;
pub use types::{Article, ArticleId, AuthResponse, Credentials};
