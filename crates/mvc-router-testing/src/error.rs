//! Route assertion failures.

use mvc_router::HandlerKind;
use thiserror::Error;

/// Why a route assertion failed
///
/// The message of each variant is what a failing `should_*` call panics with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteAssertionError {
    /// The URL resolved to no route at all. Reported before any other check.
    #[error("Url {url} did not match any routes")]
    NoMatch { url: String },

    #[error(
        "expected controller '{expected}' but the route maps to {}",
        quoted(.actual, '\'')
    )]
    ControllerMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error(
        "expected action '{expected}' but the route maps to {}",
        quoted(.actual, '\'')
    )]
    ActionMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error(
        "value for parameter '{name}' did not match: expected {}, actual {}",
        quoted(.expected, '"'),
        quoted(.actual, '"')
    )]
    ParameterMismatch {
        name: String,
        expected: Option<String>,
        actual: Option<String>,
    },

    /// The matched route uses a different handler than the assertion needs
    #[error("expected a {expected} handler but the route uses {actual}")]
    HandlerMismatch {
        expected: HandlerKind,
        actual: HandlerKind,
    },

    #[error("expected a redirect to '{expected}' but the route redirects to '{actual}'")]
    RedirectMismatch { expected: String, actual: String },

    #[error("expected page '{expected}' but the route serves '{actual}'")]
    PageMismatch { expected: String, actual: String },

    /// An argument could not be evaluated and the route has no value to compare it to
    #[error(
        "argument '{name}' could not be evaluated to a value and the route has no value for it"
    )]
    UnsupportedArgument { name: String },
}

/// Renders an optional value for a message, `<none>` when absent
fn quoted(value: &Option<String>, quote: char) -> String {
    match value {
        Some(value) => format!("{quote}{value}{quote}"),
        None => "<none>".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, RouteAssertionError>;
