//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Result alias using [`DexError`].
pub type Result<T> = std::result::Result<T, DexError>;

/// Every failure the engine reports to its caller.
///
/// None of these are retried by the engine; the caller corrects the input or the
/// provisioning gap and invokes the operation again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    /// Malformed input: bad address, identical tokens, slippage out of range.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A pool, deployment, chain or session does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// Key used for the lookup.
        key: String,
    },
    /// The entity exists but is not in a usable state.
    #[error("invalid state: {0}")]
    State(String),
    /// Non-positive reserves or amounts, division by zero, overflow.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
    /// Encoder, ABI, bytecode or storage failure.
    #[error("external failure: {0}")]
    External(String),
}

impl DexError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Creates a state error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Creates an arithmetic error.
    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic(message.into())
    }

    /// Creates an external error.
    pub fn external(message: impl Into<String>) -> Self {
        Self::External(message.into())
    }

    /// Short machine-readable name of the error category.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::State(_) => "state",
            Self::Arithmetic(_) => "arithmetic",
            Self::External(_) => "external",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DexError::not_found("session", "abc");
        assert_eq!(err.to_string(), "session not found: abc");
        assert_eq!(err.kind(), "not_found");
    }
}
