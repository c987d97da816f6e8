//! Blocking HTTP implementation of [`RecordSource`].

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{RecordSource, UserRecord};
use crate::error::FetchError;

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const USER_AGENT_VALUE: &str = concat!("user-directory/", env!("CARGO_PKG_VERSION"));

/// Record source backed by a REST endpoint exposing `/users` and `/users/{id}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; anything else is appended to the base URL.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send()?;
        handle_response(response)
    }
}

impl RecordSource for HttpSource {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, FetchError> {
        let users: Option<Vec<UserRecord>> = self.get("/users")?;
        Ok(users.unwrap_or_default())
    }

    fn fetch_one(&self, id: u64) -> Result<Option<UserRecord>, FetchError> {
        self.get(&format!("/users/{id}"))
    }
}

fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let message = error_message(&body);
        tracing::warn!(status = status.as_u16(), %message, "request rejected");
        return Err(FetchError::Status {
            status: status.as_u16(),
            message,
        });
    }
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Pull `message` out of an error body.
///
/// An unreadable body yields "Unknown error", a JSON body without a message
/// yields "Request error".
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(m) }) if !m.is_empty() => m,
        Ok(_) => "Request error".to_string(),
        Err(_) => "Unknown error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_relative_paths() {
        let src = HttpSource::new("http://api.local/", Duration::from_secs(1)).unwrap();
        assert_eq!(src.base_url(), "http://api.local");
        assert_eq!(src.build_url("/users/3"), "http://api.local/users/3");
        assert_eq!(src.build_url("https://other.host/users"), "https://other.host/users");
    }

    #[test]
    fn error_message_falls_back() {
        assert_eq!(error_message(r#"{"message":"Not found"}"#), "Not found");
        assert_eq!(error_message(r#"{"code":12}"#), "Request error");
        assert_eq!(error_message("<html>502</html>"), "Unknown error");
    }
}
