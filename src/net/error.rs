//! REST error type shared by every API helper.
//!
//! ERROR HANDLING
//! ==============
//! Callers turn an [`ApiError`] into a single user-facing line with
//! [`ApiError::user_message`]; nothing is retried automatically.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure of one REST call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("request failed: {status}")]
    Status {
        status: u16,
        /// `message` (or `error`) field from a JSON error body, if present.
        message: Option<String>,
    },
    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Called outside the browser (server render or native tests).
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Build a status error, extracting the server's message from a JSON body.
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status { status, message: server_message(body) }
    }

    /// One line suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message: Some(message), .. } => message.clone(),
            Self::Status { status: 401, .. } => "Your session has expired. Please sign in again.".to_owned(),
            Self::Status { status: 403, .. } => "You do not have permission to do that.".to_owned(),
            Self::Status { status: 404, .. } => "The requested item no longer exists.".to_owned(),
            Self::Status { status: 413, .. } => "The upload is too large for the server.".to_owned(),
            Self::Status { status, .. } if *status >= 500 => "The server had a problem. Please try again later.".to_owned(),
            Self::Status { status, .. } => format!("Request failed ({status})."),
            Self::Network(_) => "Could not reach the server. Check your connection.".to_owned(),
            Self::Decode(_) => "The server sent an unexpected response.".to_owned(),
            Self::Unavailable => "This action is only available in the browser.".to_owned(),
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
}
