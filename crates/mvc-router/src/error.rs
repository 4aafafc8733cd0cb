//! Errors raised while building routes.

use thiserror::Error;

/// A route pattern or constraint that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Pattern starts with `~` or `/`, contains `?`, or has an empty segment.
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    /// A `{` without its `}` (or the reverse).
    #[error("Unbalanced braces in route segment '{segment}'")]
    UnbalancedBraces { segment: String },

    #[error("Empty parameter name in route segment '{segment}'")]
    EmptyParameterName { segment: String },

    /// `{a}{b}`: no literal between two parameters, so they cannot be split.
    #[error("Adjacent parameters in route segment '{segment}' must be separated by a literal")]
    AdjacentParameters { segment: String },

    #[error("Catch-all parameter must be the whole segment: '{segment}'")]
    CatchAllInComplexSegment { segment: String },

    #[error("Catch-all parameter must be the last segment of '{pattern}'")]
    CatchAllNotLast { pattern: String },

    #[error("Route pattern '{pattern}' declares parameter '{name}' more than once")]
    DuplicateParameter { pattern: String, name: String },

    /// Constraint is not a valid regular expression.
    #[error("Constraint for '{name}' is not a valid pattern: {message}")]
    InvalidConstraint { name: String, message: String },
}

/// Result type alias for route construction.
pub type Result<T> = core::result::Result<T, RouteError>;
