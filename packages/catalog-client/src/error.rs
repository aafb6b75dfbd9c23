use thiserror::Error;

/// Errors returned by the catalog REST client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, TLS, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request exceeded the configured timeout
    #[error("request timed out: {url}")]
    Timeout { url: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;
