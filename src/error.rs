use thiserror::Error;

/// Errors that can occur while talking to the FindMyRecipe API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection, timeout, TLS)
    #[error("Request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server responded with status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// Response body was empty or not valid JSON
    #[error("Invalid JSON in response: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Response body was JSON but not shaped as expected
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The API processed the request and answered `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Input was refused before any request was sent
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// The operation needs a signed-in session
    #[error("Not signed in")]
    NotAuthenticated,

    /// Base URL or endpoint could not be built
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Reading a local file failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ClientError {
    /// Whether this error means "the fetch failed" from a reader's point of view:
    /// network trouble, a bad status, or an unusable body.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ClientError::FetchError(_)
                | ClientError::StatusError { .. }
                | ClientError::JsonError(_)
                | ClientError::MalformedResponse(_)
        )
    }
}
