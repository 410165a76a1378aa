/// Convenience result type used across Retrolens.
pub type RetroResult<T> = Result<T, RetroError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Nothing in the per-tick pipeline is fatal: a filter that fails aborts its
/// own pass, never the scheduler. These errors surface at API boundaries
/// (construction, capture, parameter mutation).
#[derive(thiserror::Error, Debug)]
pub enum RetroError {
    /// Invalid user-provided or control-surface data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while processing a frame (filter preconditions, sink state).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing settings records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetroError {
    /// Build a [`RetroError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RetroError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`RetroError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
