use std::fmt::{Display, Formatter};

use thiserror::Error;

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Attach a human-readable context string to a fallible operation.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug)]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl Display for SimpleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SimpleError {}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}

/// Failures surfaced by a record source call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (DNS, refused, timeout, ...).
    #[error("network error: {0}")]
    Transport(String),

    /// The response body was not the JSON shape we expected.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Text for the notification raised once per failed call.
    pub fn toast_message(&self) -> String {
        match self {
            Self::Status { status: 401, .. } => {
                "Unauthorized: your session may have expired.".to_string()
            }
            Self::Status { status: 403, .. } => "Forbidden: you do not have access.".to_string(),
            Self::Status { status, message } if *status >= 500 => {
                format!("Server error ({status}): {message}")
            }
            Self::Status { status, message } => format!("Error {status}: {message}"),
            Self::Transport(msg) => format!("Network error: {msg}"),
            Self::Decode(msg) => format!("Invalid response: {msg}"),
        }
    }

    /// Short explanation for the error panel.
    pub fn panel_message(&self) -> &str {
        match self {
            Self::Status { status: 404, .. } => "The requested user could not be found.",
            Self::Status { .. } => "The server could not complete the request.",
            Self::Transport(_) => "Could not reach the directory service.",
            Self::Decode(_) => "The directory service sent data we could not read.",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_text_follows_status_class() {
        let not_found = FetchError::Status { status: 404, message: "Not found".into() };
        assert_eq!(not_found.toast_message(), "Error 404: Not found");

        let boom = FetchError::Status { status: 503, message: "down".into() };
        assert_eq!(boom.toast_message(), "Server error (503): down");

        let auth = FetchError::Status { status: 401, message: "nope".into() };
        assert!(auth.toast_message().starts_with("Unauthorized"));
    }

    #[test]
    fn context_wraps_source_error() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.with_ctx(|| "open theme".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "open theme: gone");
    }
}
