//! Domain-level errors (no I/O, no config)

use thiserror::Error;

/// Domain errors represent violations of a node's value contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("malformed {node} state: {reason}")]
    MalformedState { node: &'static str, reason: String },
}

impl DomainError {
    pub fn invalid_field(
        field: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(node: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedState {
            node,
            reason: reason.into(),
        }
    }

    /// Report a rejected field value found while loading `node` as malformed state.
    pub fn into_malformed(self, node: &'static str) -> Self {
        match self {
            e @ Self::InvalidFieldValue { .. } => Self::malformed(node, e.to_string()),
            other => other,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
