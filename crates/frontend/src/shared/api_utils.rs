//! API utilities for frontend-backend communication
//!
//! Provides the backend origin, URL helpers, a typed error for failed
//! requests and a JSON GET helper shared by all dashboards.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Backend origin used when `LAKEHOUSE_API_ORIGIN` is not set at build time
pub const DEFAULT_API_ORIGIN: &str = "http://localhost:8000";

/// Transport-level failure of a backend request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (offline, CORS, DNS...)
    #[error("Request failed: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status
    #[error("HTTP error: {0}")]
    Status(u16),
    /// The body was not the JSON we expected
    #[error("Failed to parse response: {0}")]
    Decode(String),
    /// Query parameters could not be encoded
    #[error("Failed to build query: {0}")]
    Query(String),
}

/// Get the base URL for API requests
///
/// Resolved at compile time from `LAKEHOUSE_API_ORIGIN`, falling back to
/// [`DEFAULT_API_ORIGIN`].
pub fn api_base() -> String {
    option_env!("LAKEHOUSE_API_ORIGIN")
        .filter(|origin| !origin.trim().is_empty())
        .unwrap_or(DEFAULT_API_ORIGIN)
        .trim_end_matches('/')
        .to_string()
}

/// Build a full API URL from an origin and a path
///
/// # Example
/// ```
/// use frontend::shared::api_utils::api_url;
/// assert_eq!(api_url("http://localhost:8000/", "/api/stats"), "http://localhost:8000/api/stats");
/// ```
pub fn api_url(origin: &str, path: &str) -> String {
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// GET `url` and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    log::debug!("GET {}", url);

    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_slashes() {
        assert_eq!(
            api_url("http://localhost:8000", "/api/stats"),
            "http://localhost:8000/api/stats"
        );
        assert_eq!(
            api_url("http://localhost:8000/", "api/sales"),
            "http://localhost:8000/api/sales"
        );
    }

    #[test]
    fn test_api_base_has_no_trailing_slash() {
        assert!(!api_base().ends_with('/'));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ApiError::Status(502).to_string(), "HTTP error: 502");
        assert_eq!(
            ApiError::Decode("expected value".into()).to_string(),
            "Failed to parse response: expected value"
        );
    }
}
