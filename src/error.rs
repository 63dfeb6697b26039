use thiserror::Error;

/// Errors surfaced by the connector's fallible operations.
///
/// The popup code-exchange path swallows `Request` errors after logging them;
/// the refresh path returns them to the caller unchanged.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// The embedder failed to open the authentication window, e.g. because a
    /// popup blocker intervened.
    #[error("failed to open authentication window: {reason}")]
    WindowOpen { reason: String },

    /// A token request failed on the wire or its body was not valid JSON.
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ConnectorError {
    /// Create a `WindowOpen` error with the given reason.
    pub fn window_open(reason: impl Into<String>) -> Self {
        Self::WindowOpen {
            reason: reason.into(),
        }
    }
}
