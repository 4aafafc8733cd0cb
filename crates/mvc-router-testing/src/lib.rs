//! # MVC Router Testing
//!
//! Helpers for testing route tables:
//! - A fake request context built from a URL (`~/search?q=term`), a method
//!   and an application root
//! - Fluent assertions that a URL maps to a controller, action and arguments,
//!   is ignored, redirects, or is served by a page
//! - A URL helper for round-tripping route values through the table
//!
//! ## Example
//!
//! ```
//! use mvc_router::{Route, RouteTable};
//! use mvc_router_testing::{action, RouteAssertions, RouteTester};
//!
//! struct ProductsController;
//!
//! let table = RouteTable::new()
//!     .with_route(Route::ignore("blocked-path").unwrap())
//!     .with_route(Route::new("{controller}/{id}").unwrap().with_default("action", "Index"));
//! let tester = RouteTester::from_table(table);
//!
//! tester
//!     .get("~/products/5")
//!     .should_map_to(action!(ProductsController => index(id = 5)));
//!
//! tester.get("~/blocked-path").should_be_ignored();
//!
//! let err = tester
//!     .get("~/products/5")
//!     .check_action(&action!(ProductsController => index(id = 6)))
//!     .unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     r#"value for parameter 'id' did not match: expected "6", actual "5""#
//! );
//! ```
//!
//! The free functions ([`route`], [`post`]) and the [`UrlExt`] methods on
//! `str` resolve against [`RouteTable::global`].

use mvc_router::{RouteData, RouteTable};

mod assertions;
pub mod error;
mod expectation;
mod fake_context;
mod tester;

pub use assertions::{ResolvedRoute, RouteAssertions};
pub use error::RouteAssertionError;
pub use expectation::{
    controller_name, strip_controller_suffix, ActionCall, ArgExpr, CONTROLLER_SUFFIX,
};
pub use fake_context::{
    parse_query_string, FakeHttpContext, FakeHttpContextBuilder, FakeRequest, FakeResponse,
};
pub use tester::{resolve_with, RouteTester, UrlHelper};

/// Resolves a `GET` for `url` against the global route table
pub fn route(url: &str) -> ResolvedRoute {
    request("GET", url)
}

/// Resolves a `POST` for `url` against the global route table
pub fn post(url: &str) -> ResolvedRoute {
    request("POST", url)
}

pub fn request(method: &str, url: &str) -> ResolvedRoute {
    resolve_with(RouteTable::global(), method, url)
}

/// Route assertions straight from a URL string, against the global table
///
/// ```no_run
/// use mvc_router_testing::{action, UrlExt};
///
/// struct HomeController;
///
/// "~/".should_map_to(action!(HomeController => index()));
/// "~/trace.axd".should_be_ignored();
/// ```
pub trait UrlExt {
    fn route(&self) -> ResolvedRoute;

    #[track_caller]
    fn should_map_to_controller<C: ?Sized>(&self) -> RouteData {
        self.route().should_map_to_controller::<C>().clone()
    }

    #[track_caller]
    fn should_map_to(&self, expected: ActionCall) -> RouteData {
        self.route().should_map_to(expected).clone()
    }

    #[track_caller]
    fn should_map_to_skipping_params(&self, expected: ActionCall) -> RouteData {
        self.route().should_map_to_skipping_params(expected).clone()
    }

    #[track_caller]
    fn should_be_ignored(&self) -> RouteData {
        self.route().should_be_ignored().clone()
    }

    #[track_caller]
    fn should_redirect_to(&self, target: &str) -> RouteData {
        self.route().should_redirect_to(target).clone()
    }

    #[track_caller]
    fn should_map_to_page(&self, virtual_path: &str) -> RouteData {
        self.route().should_map_to_page(virtual_path).clone()
    }

    /// Page check where the expected virtual path is the URL itself
    #[track_caller]
    fn should_map_to_page_at_url(&self) -> RouteData {
        self.route().should_map_to_page_at_url().clone()
    }
}

impl UrlExt for str {
    fn route(&self) -> ResolvedRoute {
        route(self)
    }
}
