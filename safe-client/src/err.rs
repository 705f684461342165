use thiserror::Error;

/// Errors returned when talking to the Safe transaction service or gateway.
#[derive(Debug, Error)]
pub enum SafeClientError {
    /// Transport-level failure (connection, timeout, non-JSON body).
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    /// The service answered but rejected the request.
    #[error("safe service rejected request (HTTP {status}): {message}")]
    Api {
        /// HTTP status code of the rejection.
        status: u16,
        /// Response body, usually a JSON-encoded validation error.
        message: String,
    },
    /// A chain name we have no ID mapping for.
    #[error("unknown chain: {0}")]
    UnknownChain(String),
}
