//! Expected controller/action/argument bindings
//!
//! An [`ActionCall`] says "controller C, action A, called with these
//! arguments". It is usually built with the [`action!`](crate::action) macro,
//! which turns each argument into an [`ArgExpr`] at the call site.

use std::any::type_name;
use std::fmt::Display;

/// Suffix stripped from controller type names
pub const CONTROLLER_SUFFIX: &str = "Controller";

// ============================================================================
// Argument Expressions
// ============================================================================

/// An expected argument value, captured where the expectation is written
///
/// # Examples
///
/// ```
/// use mvc_router_testing::ArgExpr;
///
/// assert_eq!(ArgExpr::literal(5).evaluate(), Some("5".to_string()));
/// assert_eq!(ArgExpr::converted(ArgExpr::literal(2u64)).evaluate(), Some("2".to_string()));
/// assert_eq!(ArgExpr::Unsupported.evaluate(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgExpr {
    /// A literal token, already stringified
    Literal(String),
    /// A variable or other expression read at the call site
    Captured(String),
    /// A type conversion around another expression
    Converted(Box<ArgExpr>),
    /// An expression with no value to compare
    Unsupported,
}

impl ArgExpr {
    pub fn literal(value: impl Display) -> Self {
        ArgExpr::Literal(value.to_string())
    }

    pub fn captured(value: impl Display) -> Self {
        ArgExpr::Captured(value.to_string())
    }

    pub fn converted(inner: ArgExpr) -> Self {
        ArgExpr::Converted(Box::new(inner))
    }

    /// Expected route value, or `None` for an unsupported expression
    pub fn evaluate(&self) -> Option<String> {
        match self {
            ArgExpr::Literal(value) | ArgExpr::Captured(value) => Some(value.clone()),
            ArgExpr::Converted(inner) => inner.evaluate(),
            ArgExpr::Unsupported => None,
        }
    }

    /// Whether evaluation bottoms out in [`ArgExpr::Unsupported`]
    pub fn is_unsupported(&self) -> bool {
        match self {
            ArgExpr::Converted(inner) => inner.is_unsupported(),
            ArgExpr::Unsupported => true,
            ArgExpr::Literal(_) | ArgExpr::Captured(_) => false,
        }
    }
}

// ============================================================================
// Controller Names
// ============================================================================

/// Route name of a controller type: its declared name without the
/// `Controller` suffix
///
/// # Examples
///
/// ```
/// use mvc_router_testing::controller_name;
///
/// struct ProductsController;
/// struct Home;
///
/// assert_eq!(controller_name::<ProductsController>(), "Products");
/// assert_eq!(controller_name::<Home>(), "Home");
/// ```
pub fn controller_name<C: ?Sized>() -> String {
    strip_controller_suffix(short_type_name(type_name::<C>())).to_string()
}

/// Last path segment of a type name, without generic arguments
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Removes a trailing `Controller`; names without it are returned unchanged
pub fn strip_controller_suffix(name: &str) -> &str {
    name.strip_suffix(CONTROLLER_SUFFIX).unwrap_or(name)
}

// ============================================================================
// Action Calls
// ============================================================================

/// Expected controller, action and ordered argument bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    controller: String,
    action: String,
    arguments: Vec<(String, ArgExpr)>,
    check_parameters: bool,
}

impl ActionCall {
    /// Expectation for `action` on the controller type `C`
    pub fn for_controller<C: ?Sized>(action: impl Into<String>) -> Self {
        Self::new(controller_name::<C>(), action)
    }

    /// Expectation from a controller name; a `Controller` suffix is stripped
    pub fn new(controller: impl AsRef<str>, action: impl Into<String>) -> Self {
        Self {
            controller: strip_controller_suffix(controller.as_ref()).to_string(),
            action: action.into(),
            arguments: Vec::new(),
            check_parameters: true,
        }
    }

    /// Adds an expected argument, in declaration order
    pub fn arg(mut self, name: impl Into<String>, value: ArgExpr) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    /// Only controller and action are checked
    pub fn skip_parameter_checking(mut self) -> Self {
        self.check_parameters = false;
        self
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn arguments(&self) -> &[(String, ArgExpr)] {
        &self.arguments
    }

    pub fn checks_parameters(&self) -> bool {
        self.check_parameters
    }
}

// ============================================================================
// Macros
// ============================================================================

/// Builds an [`ActionCall`] from something that reads like the call itself
///
/// - `id = 5`: a literal
/// - `page = 2 as u64`, `id = n as u64`: a conversion around a literal or variable
/// - `slug = slug`, `id = item.id`: any other expression, stringified with `Display`
/// - `x = _`: no usable value
///
/// # Examples
///
/// ```
/// use mvc_router_testing::{action, ArgExpr};
///
/// struct ProductsController;
///
/// let slug = "red-shoes";
/// let call = action!(ProductsController => show(id = 5, slug = slug, page = 2 as u64));
///
/// assert_eq!(call.controller(), "Products");
/// assert_eq!(call.action(), "show");
/// assert_eq!(call.arguments()[0], ("id".to_string(), ArgExpr::literal(5)));
/// assert_eq!(call.arguments()[1].1.evaluate(), Some("red-shoes".to_string()));
/// assert_eq!(call.arguments()[2].1.evaluate(), Some("2".to_string()));
/// ```
#[macro_export]
macro_rules! action {
    ($controller:ty => $action:ident ( $($args:tt)* )) => {
        $crate::__action_args!(
            $crate::ActionCall::for_controller::<$controller>(stringify!($action));
            $($args)*
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __action_args {
    ($call:expr;) => {
        $call
    };
    ($call:expr; $name:ident = _ $(, $($rest:tt)*)?) => {
        $crate::__action_args!(
            $call.arg(stringify!($name), $crate::ArgExpr::Unsupported);
            $($($rest)*)?
        )
    };
    ($call:expr; $name:ident = $value:literal as $ty:ty $(, $($rest:tt)*)?) => {
        $crate::__action_args!(
            $call.arg(
                stringify!($name),
                $crate::ArgExpr::converted($crate::ArgExpr::literal($value as $ty)),
            );
            $($($rest)*)?
        )
    };
    ($call:expr; $name:ident = $value:literal $(, $($rest:tt)*)?) => {
        $crate::__action_args!(
            $call.arg(stringify!($name), $crate::ArgExpr::literal($value));
            $($($rest)*)?
        )
    };
    ($call:expr; $name:ident = $value:ident as $ty:ty $(, $($rest:tt)*)?) => {
        $crate::__action_args!(
            $call.arg(
                stringify!($name),
                $crate::ArgExpr::converted($crate::ArgExpr::captured($value as $ty)),
            );
            $($($rest)*)?
        )
    };
    ($call:expr; $name:ident = $value:expr $(, $($rest:tt)*)?) => {
        $crate::__action_args!(
            $call.arg(stringify!($name), $crate::ArgExpr::captured(&$value));
            $($($rest)*)?
        )
    };
}
