use thiserror::Error;

/// Failure modes of an API request.
///
/// The variant decides both the status code and whether the message is
/// shown to the caller: client and configuration faults carry their public
/// message, upstream faults carry internal detail that is only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid client input. Reported as 400 with the message as-is; no
    /// upstream call is attempted.
    #[error("{0}")]
    BadRequest(String),

    /// Missing or unusable service configuration. Reported as 500 with the
    /// message as-is.
    #[error("{0}")]
    Config(String),

    /// Upstream provider failure (transport error, bad status, malformed
    /// body). Reported as 500 with a fixed per-endpoint message; the
    /// detail here goes to the error log only.
    #[error("{0}")]
    Upstream(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}
