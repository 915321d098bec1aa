use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Identifier assigned to an article by the news service.
pub type ArticleId = i64;

/// One news item returned by the news API.
///
/// The wire format uses camelCase field names (`imageUrl`, `publishedAt`).
/// Only `id` and `title` are guaranteed present; everything else is
/// optional and defaulted on deserialization. A missing `category` is
/// normalized to "Uncategorized" at grouping time, not here: the wire
/// shape stays faithful to what the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_at: Option<i64>,
}

impl Article {
    /// Whether the article carries a non-empty image URL.
    ///
    /// Imageless articles stay in their category bucket but are excluded
    /// from rendering and selection.
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Body of `POST /api/bookmarks`: the full article plus the user it
/// belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookmarkRequest<'a> {
    pub user_id: &'a str,
    pub article: &'a Article,
}

/// Credentials and topic preferences submitted to `/login` or `/register`.
///
/// The password is wrapped in [`SecretString`] so it never appears in
/// debug output or log lines; it is exposed only at serialization time
/// inside the client.
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub preferences: Vec<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("preferences", &self.preferences)
            .finish()
    }
}

/// Response body from `/login` and `/register`.
///
/// The service signals a logical failure via the `error` field; any other
/// payload (including `{}`) means success.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_article_deserializes_camel_case() {
        let json = r#"{
            "id": 7,
            "title": "Markets rally",
            "url": "https://example.com/7",
            "imageUrl": "https://example.com/7.jpg",
            "category": "business",
            "publishedAt": 1722902400000
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.id, 7);
        assert_eq!(article.title, "Markets rally");
        assert_eq!(article.image_url.as_deref(), Some("https://example.com/7.jpg"));
        assert_eq!(article.category.as_deref(), Some("business"));
        assert_eq!(article.published_at, Some(1722902400000));
    }

    #[test]
    fn test_article_optional_fields_default() {
        let article: Article = serde_json::from_str(r#"{"id": 1, "title": "Bare"}"#).unwrap();
        assert_eq!(article.url, None);
        assert_eq!(article.image_url, None);
        assert_eq!(article.category, None);
        assert_eq!(article.published_at, None);
        assert!(!article.has_image());
    }

    #[test]
    fn test_empty_image_url_counts_as_imageless() {
        let article: Article =
            serde_json::from_str(r#"{"id": 1, "title": "T", "imageUrl": ""}"#).unwrap();
        assert!(!article.has_image());
    }

    #[test]
    fn test_bookmark_request_wire_shape() {
        let article = Article {
            id: 3,
            title: "T".to_string(),
            url: None,
            image_url: Some("x".to_string()),
            category: Some("science".to_string()),
            published_at: None,
        };
        let body = BookmarkRequest {
            user_id: "user-1",
            article: &article,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["userId"], "user-1");
        assert_eq!(value["article"]["imageUrl"], "x");
    }

    #[test]
    fn test_auth_response_error_field() {
        let ok: AuthResponse = serde_json::from_str("{}").unwrap();
        assert!(ok.error.is_none());

        let err: AuthResponse = serde_json::from_str(r#"{"error": "bad credentials"}"#).unwrap();
        assert_eq!(err.error.as_deref(), Some("bad credentials"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            username: "alice".to_string(),
            password: SecretString::from("hunter2".to_string()),
            preferences: vec!["science".to_string()],
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
