//! Error types for primitive evaluation

use thiserror::Error;

use crate::locality::LocalityId;
use crate::site::Site;
use crate::value::Value;

/// Main error type for quickbeam evaluation.
///
/// Every variant carries the [`Site`] of the primitive that raised it, so a
/// failure surfacing at the top-level evaluation call names the operator
/// (and its source label) where it originated.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Wrong number of operands or arguments
    #[error("{site}: arity error: {message}")]
    Arity {
        /// Where the error was raised
        site: Site,
        /// Human-readable detail
        message: String,
    },

    /// A `Nil` or otherwise unusable operand where a value was required
    #[error("{site}: invalid operand: {message}")]
    InvalidOperand {
        /// Where the error was raised
        site: Site,
        /// Human-readable detail
        message: String,
    },

    /// Incompatible ranks or dimensions for broadcasting
    #[error("{site}: shape mismatch: {message}")]
    ShapeMismatch {
        /// Where the error was raised
        site: Site,
        /// Human-readable detail
        message: String,
    },

    /// Incompatible value variants for the requested operation
    #[error("{site}: type mismatch: {message}")]
    TypeMismatch {
        /// Where the error was raised
        site: Site,
        /// Human-readable detail
        message: String,
    },

    /// Argument, pattern or remote node lookup failed
    #[error("{site}: unbound reference `{name}`")]
    UnboundReference {
        /// Where the error was raised
        site: Site,
        /// The name (or index) that failed to resolve
        name: String,
    },

    /// A cross-locality call could not be delivered or answered
    #[error("{site}: locality {locality} unreachable: {message}")]
    RemoteUnreachable {
        /// The remote node the call was addressed to
        site: Site,
        /// The locality that could not be reached
        locality: LocalityId,
        /// Human-readable detail
        message: String,
    },

    /// A spawned operand task panicked or was cancelled
    #[error("{site}: operand task failed: {message}")]
    TaskFailed {
        /// Where the error was raised
        site: Site,
        /// Human-readable detail
        message: String,
    },

    /// File or stream primitive failure
    #[error("{site}: I/O error: {message}")]
    Io {
        /// Where the error was raised
        site: Site,
        /// Human-readable detail
        message: String,
    },

    /// The engine's async runtime could not be started
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl EvalError {
    /// Create an arity error.
    pub fn arity(site: &Site, message: impl Into<String>) -> Self {
        Self::Arity {
            site: site.clone(),
            message: message.into(),
        }
    }

    /// Create an invalid-operand error.
    pub fn invalid_operand(site: &Site, message: impl Into<String>) -> Self {
        Self::InvalidOperand {
            site: site.clone(),
            message: message.into(),
        }
    }

    /// Create a shape-mismatch error.
    pub fn shape_mismatch(site: &Site, message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            site: site.clone(),
            message: message.into(),
        }
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(site: &Site, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            site: site.clone(),
            message: message.into(),
        }
    }

    /// Create a type-mismatch error describing two incompatible operands.
    pub fn incompatible(site: &Site, op: &str, lhs: &Value, rhs: &Value) -> Self {
        Self::type_mismatch(
            site,
            format!(
                "`{}` and `{}` are incompatible operands for `{}`",
                type_name(lhs),
                type_name(rhs),
                op
            ),
        )
    }

    /// Create an unbound-reference error.
    pub fn unbound(site: &Site, name: impl Into<String>) -> Self {
        Self::UnboundReference {
            site: site.clone(),
            name: name.into(),
        }
    }

    /// The site that raised this error, if it has one.
    pub fn site(&self) -> Option<&Site> {
        match self {
            Self::Arity { site, .. }
            | Self::InvalidOperand { site, .. }
            | Self::ShapeMismatch { site, .. }
            | Self::TypeMismatch { site, .. }
            | Self::UnboundReference { site, .. }
            | Self::RemoteUnreachable { site, .. }
            | Self::TaskFailed { site, .. }
            | Self::Io { site, .. } => Some(site),
            Self::Runtime(_) => None,
        }
    }
}

/// Result type alias for quickbeam operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Human-readable name of a value's variant, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int64",
        Value::Float(_) => "float64",
        Value::Mask(_) => "boolean array",
        Value::String(_) => "string",
        Value::List(_) => "list",
        Value::Expression(_) => "expression",
        Value::Primitive(_) => "primitive",
    }
}
