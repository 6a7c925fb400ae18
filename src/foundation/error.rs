/// Convenience result type used across keyloom.
pub type KeyloomResult<T> = Result<T, KeyloomError>;

/// Top-level error taxonomy used at keyloom's loading and configuration boundaries.
///
/// Segment iteration and lofted-output bookkeeping never return errors; they report
/// failure through terminal iterator state or boolean returns.
#[derive(thiserror::Error, Debug)]
pub enum KeyloomError {
    /// Invalid user-provided data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Structurally invalid spline data.
    #[error("spline error: {0}")]
    Spline(String),

    /// Errors raised while running an evaluation pass.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeyloomError {
    /// Build a [`KeyloomError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeyloomError::Spline`] value.
    pub fn spline(msg: impl Into<String>) -> Self {
        Self::Spline(msg.into())
    }

    /// Build a [`KeyloomError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`KeyloomError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for KeyloomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
