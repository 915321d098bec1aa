use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::types::{Article, AuthResponse, BookmarkRequest, Credentials};

/// Default per-request timeout. Overridable via config.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from talking to the remote news/auth services.
///
/// `Rejected` is the one logical error: the service answered and said no
/// (the `error` field of an auth response). Everything else is transport
/// or response-shape trouble, and the UI collapses all of it into a
/// generic "try again later" status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code and no parseable body
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body did not match the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(String),
    /// The service reported a logical error (the `error` response field)
    #[error("{0}")]
    Rejected(String),
}

/// Typed client for the aggregator's two HTTP surfaces.
///
/// `news_base` serves `GET /api/news`; `auth_base` serves `POST /login`,
/// `POST /register`, and `POST /api/bookmarks`. The two may point at the
/// same host. All requests share one pooled `reqwest::Client` and one
/// explicit timeout; there are no retries, since every operation here is
/// user-triggered and the user can simply try again.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    news_base: Url,
    auth_base: Url,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(news_base: &str, auth_base: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            news_base: Url::parse(news_base)
                .map_err(|e| anyhow::anyhow!("Invalid news API URL '{}': {}", news_base, e))?,
            auth_base: Url::parse(auth_base)
                .map_err(|e| anyhow::anyhow!("Invalid auth API URL '{}': {}", auth_base, e))?,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }

    /// Fetches the article list for the window starting at `since_ms`
    /// (epoch milliseconds, passed as the `timestamp` query parameter).
    pub async fn fetch_articles(&self, since_ms: i64) -> Result<Vec<Article>, ApiError> {
        let url = self.endpoint(&self.news_base, "/api/news")?;
        tracing::debug!(url = %url, since_ms = since_ms, "Fetching articles");

        let response = self
            .send(self.http.get(url).query(&[("timestamp", since_ms)]))
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }

        response
            .json::<Vec<Article>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Saves a bookmark for `user_id`. The full article travels in the
    /// body; the service keeps whatever it wants of it.
    pub async fn save_bookmark(&self, user_id: &str, article: &Article) -> Result<(), ApiError> {
        let url = self.endpoint(&self.auth_base, "/api/bookmarks")?;
        tracing::debug!(url = %url, article_id = article.id, "Saving bookmark");

        let body = BookmarkRequest { user_id, article };
        let response = self.send(self.http.post(url).json(&body)).await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }

    /// Logs in with existing credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.authenticate("/login", credentials).await
    }

    /// Registers a new account with credentials and topic preferences.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.authenticate("/register", credentials).await
    }

    async fn authenticate(&self, path: &str, credentials: &Credentials) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct AuthRequest<'a> {
            username: &'a str,
            password: &'a str,
            preferences: &'a [String],
        }

        let url = self.endpoint(&self.auth_base, path)?;
        tracing::debug!(url = %url, username = %credentials.username, "Submitting credentials");

        let body = AuthRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
            preferences: &credentials.preferences,
        };
        let response = self.send(self.http.post(url).json(&body)).await?;

        // The service signals failure through the `error` field, not the
        // status code, so the body is parsed before the status is consulted.
        let status = response.status();
        match response.json::<AuthResponse>().await {
            Ok(AuthResponse { error: Some(msg) }) => Err(ApiError::Rejected(msg)),
            Ok(AuthResponse { error: None }) => Ok(()),
            Err(_) if !status.is_success() => Err(ApiError::HttpStatus(status.as_u16())),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)
    }

    fn endpoint(&self, base: &Url, path: &str) -> Result<Url, ApiError> {
        base.join(path)
            .map_err(|e| ApiError::Decode(format!("invalid endpoint {}: {}", path, e)))
    }
}
