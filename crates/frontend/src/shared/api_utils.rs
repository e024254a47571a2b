//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and turning failed
//! responses into user-facing messages.

use contracts::shared::api_error::ApiErrorBody;
use gloo_net::http::Response;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/lines/distinct");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Message of a non-2xx response: the `message` of an `ApiErrorBody`
/// when the body carries one, otherwise `HTTP <status>`.
pub async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    message_from_body(status, &body)
}

fn message_from_body(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) if !err.message.trim().is_empty() => err.message,
        _ => format!("HTTP {}", status),
    }
}

/// Send a prepared request and decode a JSON response.
///
/// Transport failures become `Failed to <action>: ...`, non-2xx responses go
/// through [`error_message`].
pub async fn send_json<T: serde::de::DeserializeOwned>(
    request: gloo_net::http::Request,
    action: &str,
) -> Result<T, String> {
    let response = request
        .send()
        .await
        .map_err(|e| format!("Failed to {}: {}", action, e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_taken_from_error_body() {
        let body = r#"{"message":"Model Name and MO cannot both be ALL"}"#;
        assert_eq!(
            message_from_body(400, body),
            "Model Name and MO cannot both be ALL"
        );
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(message_from_body(502, "<html>bad gateway</html>"), "HTTP 502");
        assert_eq!(message_from_body(500, r#"{"message":"  "}"#), "HTTP 500");
        assert_eq!(message_from_body(404, ""), "HTTP 404");
    }
}
