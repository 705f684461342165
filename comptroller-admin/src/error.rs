use safe_client::err::SafeClientError;

/// The result of an administrative operation.
pub type AdminResult<T> = Result<T, AdminError>;

/// Errors surfaced by the proposal, verification and check pipelines.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The Safe transaction service or gateway failed.
    #[error(transparent)]
    SafeClient(#[from] SafeClientError),
    /// A plain HTTP dependency (verification API) failed.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// A retried operation failed on its final attempt.
    #[error("\"{label}\" failed after {attempts} attempts")]
    RetriesExhausted {
        /// Call-site label configured on the [`crate::RetryPolicy`].
        label: String,
        /// Attempt budget that was exhausted.
        attempts: usize,
        /// Error from the last attempt.
        #[source]
        source: Box<AdminError>,
    },
    /// Producing the off-chain signature failed.
    #[error("proposal signing failed")]
    Signer(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Broadcasting a direct (non-multisig) transaction failed.
    #[error("direct transaction dispatch failed")]
    DirectSend(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// An RPC read (storage slot query) failed.
    #[error("rpc query failed")]
    Rpc(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The verification service rejected the request for a reason that is
    /// neither "already verified" nor the known argument-length limitation.
    #[error("source verification rejected: {message}")]
    Verification {
        /// Service-reported rejection reason.
        message: String,
    },
    /// A deployed contract's storage does not match its expected
    /// configuration.
    #[error("deployment check failed: {field}: expected {expected}, got {actual}")]
    CheckFailed {
        /// Name of the checked field.
        field: &'static str,
        /// Expected value.
        expected: String,
        /// Value read from storage.
        actual: String,
    },
}
