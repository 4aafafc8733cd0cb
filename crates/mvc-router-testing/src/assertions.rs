//! Fluent route assertions
//!
//! Every `check_*` method is a pure comparison returning the route data or a
//! [`RouteAssertionError`]. The matching `should_*` method panics with the
//! error's message, which is how a test reports the failure, and returns the
//! route data so assertions can be chained.

use mvc_router::{eq_ignore_case, HandlerKind, RouteData, RouteHandler};
use tracing::debug;

use crate::error::{Result, RouteAssertionError};
use crate::expectation::{controller_name, ActionCall, ArgExpr};

// ============================================================================
// Resolved Route
// ============================================================================

/// Outcome of resolving one URL: the URL under test and the route data, if any
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    url: String,
    data: Option<RouteData>,
}

impl ResolvedRoute {
    pub fn new(url: impl Into<String>, data: Option<RouteData>) -> Self {
        Self {
            url: url.into(),
            data,
        }
    }

    /// The URL as the test gave it
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn data(&self) -> Option<&RouteData> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<RouteData> {
        self.data
    }

    pub fn is_match(&self) -> bool {
        self.data.is_some()
    }

    /// Page check where the expected virtual path is the URL under test
    pub fn check_page_at_url(&self) -> Result<&RouteData> {
        self.check_page(&self.url)
    }

    #[track_caller]
    pub fn should_map_to_page_at_url(&self) -> &RouteData {
        pass_or_panic(self.check_page_at_url())
    }
}

// ============================================================================
// Assertion Trait
// ============================================================================

/// Assertions over a route resolution result
///
/// Implemented for [`ResolvedRoute`] (which may hold no match) and for
/// [`RouteData`] itself, so `should_*` calls chain.
pub trait RouteAssertions {
    /// The route data, or [`RouteAssertionError::NoMatch`]
    fn route_data(&self) -> Result<&RouteData>;

    /// Controller of the route is `C` (its type name minus `Controller`)
    fn check_controller<C: ?Sized>(&self) -> Result<&RouteData> {
        self.check_controller_named(&controller_name::<C>())
    }

    fn check_controller_named(&self, expected: &str) -> Result<&RouteData> {
        let data = self.route_data()?;
        expect_handler(data, HandlerKind::Mvc)?;
        expect_controller(data, expected)?;
        Ok(data)
    }

    /// Controller, action and (unless skipped) every argument
    fn check_action(&self, expected: &ActionCall) -> Result<&RouteData> {
        let data = self.check_controller_named(expected.controller())?;

        let actual = data.action();
        if !actual.is_some_and(|action| eq_ignore_case(action, expected.action())) {
            return Err(RouteAssertionError::ActionMismatch {
                expected: expected.action().to_string(),
                actual: actual.map(str::to_string),
            });
        }

        if expected.checks_parameters() {
            for (name, arg) in expected.arguments() {
                expect_argument(data, name, arg)?;
            }
        }

        debug!(
            controller = expected.controller(),
            action = expected.action(),
            "route matched expectation"
        );
        Ok(data)
    }

    /// The router declines to dispatch the URL
    fn check_ignored(&self) -> Result<&RouteData> {
        let data = self.route_data()?;
        expect_handler(data, HandlerKind::Stop)?;
        Ok(data)
    }

    /// The route redirects to exactly `target`
    fn check_redirect(&self, target: &str) -> Result<&RouteData> {
        let data = self.route_data()?;
        match &data.handler {
            RouteHandler::Redirect { target: actual } if actual == target => Ok(data),
            RouteHandler::Redirect { target: actual } => Err(RouteAssertionError::RedirectMismatch {
                expected: target.to_string(),
                actual: actual.clone(),
            }),
            other => Err(RouteAssertionError::HandlerMismatch {
                expected: HandlerKind::Redirect,
                actual: other.kind(),
            }),
        }
    }

    /// The route is served by the page at exactly `virtual_path`
    fn check_page(&self, virtual_path: &str) -> Result<&RouteData> {
        let data = self.route_data()?;
        match &data.handler {
            RouteHandler::Page { virtual_path: actual } if actual == virtual_path => Ok(data),
            RouteHandler::Page { virtual_path: actual } => Err(RouteAssertionError::PageMismatch {
                expected: virtual_path.to_string(),
                actual: actual.clone(),
            }),
            other => Err(RouteAssertionError::HandlerMismatch {
                expected: HandlerKind::Page,
                actual: other.kind(),
            }),
        }
    }

    #[track_caller]
    fn should_match(&self) -> &RouteData {
        pass_or_panic(self.route_data())
    }

    #[track_caller]
    fn should_map_to_controller<C: ?Sized>(&self) -> &RouteData {
        pass_or_panic(self.check_controller::<C>())
    }

    #[track_caller]
    fn should_map_to(&self, expected: ActionCall) -> &RouteData {
        pass_or_panic(self.check_action(&expected))
    }

    /// Like [`should_map_to`](Self::should_map_to), checking only controller and action
    #[track_caller]
    fn should_map_to_skipping_params(&self, expected: ActionCall) -> &RouteData {
        pass_or_panic(self.check_action(&expected.skip_parameter_checking()))
    }

    #[track_caller]
    fn should_be_ignored(&self) -> &RouteData {
        pass_or_panic(self.check_ignored())
    }

    #[track_caller]
    fn should_redirect_to(&self, target: &str) -> &RouteData {
        pass_or_panic(self.check_redirect(target))
    }

    #[track_caller]
    fn should_map_to_page(&self, virtual_path: &str) -> &RouteData {
        pass_or_panic(self.check_page(virtual_path))
    }
}

impl RouteAssertions for ResolvedRoute {
    fn route_data(&self) -> Result<&RouteData> {
        self.data.as_ref().ok_or_else(|| RouteAssertionError::NoMatch {
            url: self.url.clone(),
        })
    }
}

impl RouteAssertions for RouteData {
    fn route_data(&self) -> Result<&RouteData> {
        Ok(self)
    }
}

// ============================================================================
// Checks
// ============================================================================

fn expect_handler(data: &RouteData, expected: HandlerKind) -> Result<()> {
    let actual = data.handler.kind();
    if actual == expected {
        Ok(())
    } else {
        Err(RouteAssertionError::HandlerMismatch { expected, actual })
    }
}

fn expect_controller(data: &RouteData, expected: &str) -> Result<()> {
    let actual = data.controller();
    if actual.is_some_and(|controller| eq_ignore_case(controller, expected)) {
        Ok(())
    } else {
        Err(RouteAssertionError::ControllerMismatch {
            expected: expected.to_lowercase(),
            actual: actual.map(str::to_string),
        })
    }
}

/// Compares one argument with the route value of the same name
///
/// An argument without a value fails loudly when the route has no value
/// either, instead of passing as "absent equals absent".
fn expect_argument(data: &RouteData, name: &str, arg: &ArgExpr) -> Result<()> {
    let actual = data.value(name);
    if arg.is_unsupported() && actual.is_none() {
        return Err(RouteAssertionError::UnsupportedArgument {
            name: name.to_string(),
        });
    }

    let expected = arg.evaluate();
    if expected.is_some() && expected.as_deref() == actual {
        Ok(())
    } else {
        Err(RouteAssertionError::ParameterMismatch {
            name: name.to_string(),
            expected,
            actual: actual.map(str::to_string),
        })
    }
}

#[track_caller]
fn pass_or_panic<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}
