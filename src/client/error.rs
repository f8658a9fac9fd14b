use thiserror::Error;

/// Failures surfaced to the user by the submission client.
/// The display text is what the UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Caught before any network call
    #[error("{0}")]
    Validation(String),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Network failure or non-success response
    #[error("{0}")]
    Request(String),
}
