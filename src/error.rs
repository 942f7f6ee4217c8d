//! Error type returned by the session, progression and statistics operations.

/// Failures surfaced to the calling layer.
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    /// A session or user id did not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was rejected before touching any state.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The storage round trip failed. Never retried locally.
    #[error("persistence failure: {0:#}")]
    Persistence(anyhow::Error),
}

pub type FocusResult<T> = Result<T, FocusError>;

impl FocusError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

// Database closures run under `anyhow`; a `FocusError` raised inside one is
// recovered here instead of being reported as a storage failure.
impl From<anyhow::Error> for FocusError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<FocusError>() {
            Ok(focus_err) => focus_err,
            Err(other) => FocusError::Persistence(other),
        }
    }
}
