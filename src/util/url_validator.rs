use thiserror::Error;
use url::Url;

/// Errors from validating an article link before opening it.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates an article URL before it is handed to the OS opener.
///
/// Links arrive from a remote service and are opened with the user's
/// default browser; anything that is not a plain http(s) URL with a host
/// is rejected so a crafted `file://` or custom-scheme link cannot reach
/// an arbitrary local handler.
pub fn validate_link(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_links() {
        assert!(validate_link("https://example.com/story/42").is_ok());
        assert!(validate_link("http://news.example.org").is_ok());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(validate_link("file:///etc/passwd").is_err());
        assert!(validate_link("javascript:alert(1)").is_err());
        assert!(validate_link("ftp://example.com").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_link("not a url").is_err());
        assert!(validate_link("").is_err());
    }

    #[test]
    fn test_link_with_port_accepted() {
        assert!(validate_link("https://example.com:8443/a").is_ok());
    }
}
