//! # MVC Router
//!
//! A small, in-process MVC route table:
//! - Patterns like `{controller}/{action}/{id}` with literal segments
//! - Defaults and optional parameters (`home`/`index`, optional `id`)
//! - Regex constraints and HTTP method constraints
//! - Catch-all parameters (`{*path}`) and complex segments (`{resource}.axd`)
//! - Ignore, redirect and page routes next to normal controller dispatch
//! - URL generation from route values (the reverse of matching)
//!
//! Routes are tried in registration order; the first match wins. Literal
//! segments and route value keys compare case-insensitively.
//!
//! ## Example
//!
//! ```
//! use mvc_router::{Route, RouteTable, RouteValues};
//!
//! let table = RouteTable::new()
//!     .with_route(Route::ignore("{resource}.axd/{*pathInfo}").unwrap())
//!     .with_route(
//!         Route::new("{controller}/{action}/{id}")
//!             .unwrap()
//!             .with_default("controller", "home")
//!             .with_default("action", "index")
//!             .with_optional("id"),
//!     );
//!
//! let data = table.resolve_path("GET", "~/products/show/5").unwrap();
//! assert_eq!(data.controller(), Some("products"));
//! assert_eq!(data.action(), Some("show"));
//! assert_eq!(data.value("ID"), Some("5"));
//!
//! let values = RouteValues::from([("controller", "products"), ("action", "index")]);
//! assert_eq!(table.url_for(&values), Some("/products".to_string()));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::{debug, trace};

// ============================================================================
// Module Declarations
// ============================================================================

mod constraint;
mod context;
pub mod error;
mod handler;
pub mod path;
pub mod route;
mod values;

pub use constraint::{HttpMethodConstraint, ParameterConstraint};
pub use context::RequestContext;
pub use error::RouteError;
pub use handler::{HandlerKind, RouteHandler};
pub use path::normalize_path;
pub use route::{parse_pattern, Segment, SegmentPart};
pub use values::{eq_ignore_case, CaseInsensitiveMap, QueryParams, RouteValues};

use context::PathRequest;
use values::fold_key;

/// Route value key holding the controller name
pub const CONTROLLER_KEY: &str = "controller";

/// Route value key holding the action name
pub const ACTION_KEY: &str = "action";

// ============================================================================
// Core Types
// ============================================================================

/// A single route: pattern, defaults, constraints and handler
#[derive(Debug, Clone)]
pub struct Route {
    /// Pattern as registered, e.g. `{controller}/{action}/{id}`
    pub url: String,
    /// Compiled pattern segments
    pub segments: Vec<Segment>,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    /// Whether the last segment is a catch-all
    pub has_catch_all: bool,
    /// Values used when a parameter is not in the URL, or for keys the pattern lacks
    pub defaults: RouteValues,
    /// Parameters that may be absent without a default (left out of route values)
    pub optional_params: Vec<String>,
    /// Constraints keyed by folded parameter name
    pub param_constraints: HashMap<String, ParameterConstraint>,
    /// Allowed HTTP methods; `None` allows every method
    pub methods: Option<HttpMethodConstraint>,
    /// What the router does with a request matching this route
    pub handler: RouteHandler,
    /// Optional name for URL generation by route name
    pub name: Option<String>,
}

/// Result of resolving a request against the route table
#[derive(Debug, Clone, PartialEq)]
pub struct RouteData {
    /// Values bound from the URL plus defaults
    pub values: RouteValues,
    /// Handler of the matched route (redirect targets already substituted)
    pub handler: RouteHandler,
    /// Pattern of the matched route
    pub route_url: String,
    /// Name of the matched route, if it has one
    pub route_name: Option<String>,
}

impl RouteData {
    pub fn controller(&self) -> Option<&str> {
        self.values.get(CONTROLLER_KEY)
    }

    pub fn action(&self) -> Option<&str> {
        self.values.get(ACTION_KEY)
    }

    /// Case-insensitive route value lookup
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key)
    }
}

// ============================================================================
// Route Implementation
// ============================================================================

impl Route {
    /// Creates a controller-dispatch route from a pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_router::Route;
    ///
    /// let route = Route::new("products/{id}").unwrap();
    /// assert_eq!(route.params, vec!["id"]);
    /// assert!(route.matches("products/5").is_some());
    /// ```
    pub fn new(url: impl Into<String>) -> error::Result<Self> {
        Self::with_handler(url, RouteHandler::Mvc)
    }

    /// Creates a route the router must not dispatch (an ignore route)
    pub fn ignore(url: impl Into<String>) -> error::Result<Self> {
        Self::with_handler(url, RouteHandler::Stop)
    }

    /// Creates a redirect route
    ///
    /// `{name}` placeholders in the target are replaced with matched values.
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_router::{Route, RouteTable};
    ///
    /// let table = RouteTable::new()
    ///     .with_route(Route::redirect("blog/{slug}", "/articles/{slug}").unwrap());
    ///
    /// let data = table.resolve_path("GET", "~/blog/hello-world").unwrap();
    /// assert_eq!(data.handler.redirect_target(), Some("/articles/hello-world"));
    /// ```
    pub fn redirect(url: impl Into<String>, target: impl Into<String>) -> error::Result<Self> {
        Self::with_handler(
            url,
            RouteHandler::Redirect {
                target: target.into(),
            },
        )
    }

    /// Creates a route served by a page at `virtual_path`
    pub fn page(url: impl Into<String>, virtual_path: impl Into<String>) -> error::Result<Self> {
        Self::with_handler(
            url,
            RouteHandler::Page {
                virtual_path: virtual_path.into(),
            },
        )
    }

    /// Creates a route with an explicit handler
    pub fn with_handler(url: impl Into<String>, handler: RouteHandler) -> error::Result<Self> {
        let url = url.into();
        let parsed = parse_pattern(&url)?;

        Ok(Route {
            url,
            segments: parsed.segments,
            params: parsed.params,
            has_catch_all: parsed.has_catch_all,
            defaults: RouteValues::new(),
            optional_params: Vec::new(),
            param_constraints: HashMap::new(),
            methods: None,
            handler,
            name: None,
        })
    }

    /// The conventional `{controller}/{action}/{id}` route
    ///
    /// Defaults to `home`/`index` with an optional `id`.
    pub fn default_mvc() -> Self {
        Route {
            url: "{controller}/{action}/{id}".to_string(),
            segments: vec![
                Segment::Parameter(CONTROLLER_KEY.to_string()),
                Segment::Parameter(ACTION_KEY.to_string()),
                Segment::Parameter("id".to_string()),
            ],
            params: vec![
                CONTROLLER_KEY.to_string(),
                ACTION_KEY.to_string(),
                "id".to_string(),
            ],
            has_catch_all: false,
            defaults: RouteValues::from([(CONTROLLER_KEY, "home"), (ACTION_KEY, "index")]),
            optional_params: vec!["id".to_string()],
            param_constraints: HashMap::new(),
            methods: None,
            handler: RouteHandler::Mvc,
            name: Some("Default".to_string()),
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Sets a default value
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_router::Route;
    ///
    /// let route = Route::new("{controller}/{id}")
    ///     .unwrap()
    ///     .with_default("action", "Index");
    ///
    /// let values = route.matches("products/5").unwrap();
    /// assert_eq!(values.get("action"), Some("Index"));
    /// ```
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Sets several defaults at once
    pub fn with_defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in defaults {
            self.defaults.insert(key, value);
        }
        self
    }

    /// Marks a parameter as optional: it may be missing from the URL and then
    /// is left out of the route values
    pub fn with_optional(mut self, name: impl Into<String>) -> Self {
        self.optional_params.push(name.into());
        self
    }

    /// Adds a regex (or shorthand) constraint on a parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_router::Route;
    ///
    /// let route = Route::new("products/{id}")
    ///     .unwrap()
    ///     .with_constraint("id", r"\d+")
    ///     .unwrap();
    ///
    /// assert!(route.matches("products/5").is_some());
    /// assert!(route.matches("products/five").is_none());
    /// ```
    pub fn with_constraint(mut self, name: &str, pattern: &str) -> error::Result<Self> {
        let constraint = ParameterConstraint::parse(name, pattern)?;
        self.param_constraints.insert(fold_key(name), constraint);
        Ok(self)
    }

    /// Restricts the route to the given HTTP methods
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods = Some(HttpMethodConstraint::new(methods));
        self
    }

    /// Names the route for [`RouteTable::url_for_route`]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // ========================================================================
    // Matching
    // ========================================================================

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| eq_ignore_case(p, name))
    }

    pub fn is_optional(&self, name: &str) -> bool {
        self.optional_params.iter().any(|p| eq_ignore_case(p, name))
    }

    /// Whether a segment may be left out of the URL entirely
    fn can_omit(&self, segment: &Segment) -> bool {
        match segment {
            Segment::CatchAll(_) => true,
            Segment::Parameter(name) => {
                self.defaults.contains_key(name) || self.is_optional(name)
            }
            Segment::Literal(_) | Segment::Complex { .. } => false,
        }
    }

    /// Matches a routable path (see [`normalize_path`]) ignoring the HTTP method
    pub fn matches(&self, path: &str) -> Option<RouteValues> {
        let path_segments: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        };

        // Recursive walk over pattern and path segments
        fn match_segments(
            route: &Route,
            segments: &[Segment],
            remaining: &[&str],
            mut values: RouteValues,
        ) -> Option<RouteValues> {
            let Some((segment, rest)) = segments.split_first() else {
                // Consumed the whole pattern: success only if the path is consumed too
                return remaining.is_empty().then_some(values);
            };

            match segment {
                Segment::CatchAll(name) => {
                    if !remaining.is_empty() {
                        let joined = remaining
                            .iter()
                            .map(|s| path::decode_segment(s))
                            .collect::<Vec<_>>()
                            .join("/");
                        values.insert(name.clone(), joined);
                    }
                    Some(values)
                }
                // Path ran out: the rest of the pattern must be omittable
                _ if remaining.is_empty() => segments
                    .iter()
                    .all(|s| route.can_omit(s))
                    .then_some(values),
                Segment::Literal(literal) => {
                    if !eq_ignore_case(literal, &path::decode_segment(remaining[0])) {
                        return None;
                    }
                    match_segments(route, rest, &remaining[1..], values)
                }
                Segment::Parameter(name) => {
                    values.insert(name.clone(), path::decode_segment(remaining[0]).into_owned());
                    match_segments(route, rest, &remaining[1..], values)
                }
                Segment::Complex { parts, matcher } => {
                    let decoded = path::decode_segment(remaining[0]);
                    let captures = matcher.captures(&decoded)?;
                    let names = parts.iter().filter_map(|part| match part {
                        SegmentPart::Parameter(name) => Some(name),
                        SegmentPart::Literal(_) => None,
                    });
                    for (i, name) in names.enumerate() {
                        let value = captures.get(i + 1)?.as_str();
                        values.insert(name.clone(), value);
                    }
                    match_segments(route, rest, &remaining[1..], values)
                }
            }
        }

        let mut values = match_segments(self, &self.segments, &path_segments, RouteValues::new())?;
        values.merge_missing(&self.defaults);

        if self.constraints_hold(&values) {
            Some(values)
        } else {
            None
        }
    }

    /// Matches a path and checks the HTTP method constraint
    pub fn matches_request(&self, path: &str, method: &str) -> Option<RouteValues> {
        if let Some(methods) = &self.methods {
            if !methods.allows(method) {
                trace!(route = %self.url, method, "method not allowed");
                return None;
            }
        }
        self.matches(path)
    }

    /// Validates parameter constraints; absent optional parameters are skipped
    fn constraints_hold(&self, values: &RouteValues) -> bool {
        self.param_constraints.iter().all(|(name, constraint)| {
            match values.get(name) {
                Some(value) => constraint.validate(value),
                None if self.is_optional(name) => true,
                None => constraint.validate(""),
            }
        })
    }

    /// Handler for a match, with redirect placeholders substituted
    fn handler_for(&self, values: &RouteValues) -> RouteHandler {
        match &self.handler {
            RouteHandler::Redirect { target } => RouteHandler::Redirect {
                target: substitute_placeholders(target, values),
            },
            other => other.clone(),
        }
    }

    // ========================================================================
    // URL Generation
    // ========================================================================

    /// Builds the app-relative URL for these route values
    ///
    /// Returns `None` when the route cannot produce a URL for the values: a
    /// required parameter is missing, a value contradicts a default the
    /// pattern does not carry, or a constraint fails. Trailing segments whose
    /// value equals the default are left out. Values the pattern does not
    /// use become the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_router::{Route, RouteValues};
    ///
    /// let route = Route::default_mvc();
    ///
    /// let values = RouteValues::from([("controller", "products"), ("action", "show"), ("id", "5")]);
    /// assert_eq!(route.generate_url(&values), Some("/products/show/5".to_string()));
    ///
    /// let values = RouteValues::from([("controller", "home"), ("action", "index")]);
    /// assert_eq!(route.generate_url(&values), Some("/".to_string()));
    ///
    /// let values = RouteValues::from([("controller", "search"), ("action", "index"), ("q", "rust lang")]);
    /// assert_eq!(route.generate_url(&values), Some("/search?q=rust%20lang".to_string()));
    /// ```
    pub fn generate_url(&self, values: &RouteValues) -> Option<String> {
        if self.handler != RouteHandler::Mvc {
            return None;
        }

        // Defaults for keys outside the pattern pin this route to those values
        let contradicts_default = self.defaults.iter().any(|(key, default)| {
            !self.has_param(key)
                && values
                    .get(key)
                    .is_some_and(|given| !eq_ignore_case(given, default))
        });
        if contradicts_default {
            return None;
        }

        let value_for = |name: &str| -> Option<&str> {
            values
                .get(name)
                .filter(|v| !v.is_empty())
                .or_else(|| self.defaults.get(name))
        };
        let is_default = |name: &str| -> bool {
            match (values.get(name).filter(|v| !v.is_empty()), self.defaults.get(name)) {
                (None, _) => true,
                (Some(given), Some(default)) => eq_ignore_case(given, default),
                (Some(_), None) => false,
            }
        };

        // (text, omittable) per segment
        let mut parts: Vec<(String, bool)> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let part = match segment {
                Segment::Literal(literal) => (literal.clone(), false),
                Segment::Parameter(name) => match value_for(name) {
                    Some(value) => (urlencoding::encode(value).into_owned(), is_default(name)),
                    None if self.is_optional(name) => (String::new(), true),
                    None => return None,
                },
                Segment::CatchAll(name) => {
                    let value = value_for(name).unwrap_or_default();
                    let encoded = value
                        .split('/')
                        .map(|s| urlencoding::encode(s).into_owned())
                        .collect::<Vec<_>>()
                        .join("/");
                    (encoded, is_default(name))
                }
                Segment::Complex { parts, .. } => {
                    let mut text = String::new();
                    for part in parts {
                        match part {
                            SegmentPart::Literal(literal) => text.push_str(literal),
                            SegmentPart::Parameter(name) => {
                                text.push_str(&urlencoding::encode(value_for(name)?))
                            }
                        }
                    }
                    (text, false)
                }
            };
            parts.push(part);
        }

        // Check constraints against the values the URL will carry
        let all_valid = self.param_constraints.iter().all(|(name, constraint)| {
            match value_for(name) {
                Some(value) => constraint.validate(value),
                None => self.is_optional(name),
            }
        });
        if !all_valid {
            return None;
        }

        while parts.last().is_some_and(|(_, omittable)| *omittable) {
            parts.pop();
        }
        // An empty optional value cannot sit in the middle of a URL
        if parts.iter().any(|(text, _)| text.is_empty()) {
            return None;
        }

        let path = parts
            .into_iter()
            .map(|(text, _)| text)
            .collect::<Vec<_>>()
            .join("/");

        let query = values
            .iter()
            .filter(|(key, value)| {
                !value.is_empty() && !self.has_param(key) && !self.defaults.contains_key(key)
            })
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>();

        let mut url = format!("/{}", path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        Some(url)
    }
}

/// Replaces `{name}` placeholders with route values; unknown names are left as-is
fn substitute_placeholders(template: &str, values: &RouteValues) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('}') {
            Some(close) => {
                let name = &after[1..close];
                match values.get(name) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&after[..=close]),
                }
                rest = &after[close + 1..];
            }
            None => {
                result.push_str(after);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

// ============================================================================
// Route Resolution Seam
// ============================================================================

/// Anything that can resolve request contexts and build URLs from route values
pub trait RouteResolver {
    fn resolve(&self, ctx: &dyn RequestContext) -> Option<RouteData>;

    fn url_for(&self, values: &RouteValues) -> Option<String>;
}

// ============================================================================
// RouteTable Implementation
// ============================================================================

static GLOBAL_ROUTES: Lazy<RwLock<RouteTable>> = Lazy::new(|| RwLock::new(RouteTable::new()));

/// Ordered collection of routes; the first matching route wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    named_routes: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding only [`Route::default_mvc`]
    pub fn with_default_route() -> Self {
        Self::new().with_route(Route::default_mvc())
    }

    /// The process-wide route table
    ///
    /// Register routes during test setup, then resolve against it. Reads take
    /// the shared lock only for the duration of a lookup.
    pub fn global() -> &'static RwLock<RouteTable> {
        &GLOBAL_ROUTES
    }

    /// Adds a route (builder style)
    pub fn with_route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    /// Appends a route; a later route with the same name replaces the name binding
    pub fn add_route(&mut self, route: Route) {
        if let Some(name) = &route.name {
            self.named_routes.insert(name.clone(), self.routes.len());
        }
        debug!(url = %route.url, handler = %route.handler.kind(), "registered route");
        self.routes.push(route);
    }

    /// Registers a named controller route with defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_router::RouteTable;
    ///
    /// let mut table = RouteTable::new();
    /// table
    ///     .map_route("Product", "products/{id}", [("controller", "products"), ("action", "show")])
    ///     .unwrap();
    ///
    /// let data = table.resolve_path("GET", "~/products/7").unwrap();
    /// assert_eq!(data.action(), Some("show"));
    /// ```
    pub fn map_route<I, K, V>(&mut self, name: &str, url: &str, defaults: I) -> error::Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let route = Route::new(url)?.with_defaults(defaults).with_name(name);
        self.add_route(route);
        Ok(self)
    }

    /// Registers an ignore route
    pub fn ignore_route(&mut self, url: &str) -> error::Result<&mut Self> {
        self.add_route(Route::ignore(url)?);
        Ok(self)
    }

    pub fn clear(&mut self) {
        self.routes.clear();
        self.named_routes.clear();
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn get_route_by_name(&self, name: &str) -> Option<&Route> {
        self.named_routes.get(name).map(|&i| &self.routes[i])
    }

    /// Resolves a request context to route data
    ///
    /// The query string never contributes route values.
    pub fn resolve(&self, ctx: &dyn RequestContext) -> Option<RouteData> {
        let route_path = path::request_path(ctx.app_relative_path(), ctx.path_info());
        let method = ctx.http_method();

        let found = self.routes.iter().find_map(|route| {
            route.matches_request(&route_path, method).map(|values| RouteData {
                handler: route.handler_for(&values),
                values,
                route_url: route.url.clone(),
                route_name: route.name.clone(),
            })
        });

        match &found {
            Some(data) => debug!(
                path = %route_path,
                method,
                route = %data.route_url,
                values = %data.values,
                "resolved route"
            ),
            None => debug!(path = %route_path, method, "no route matched"),
        }
        found
    }

    /// Resolves a bare method + app-relative URL (any query string is dropped)
    pub fn resolve_path(&self, method: &str, url: &str) -> Option<RouteData> {
        let path = url.split_once('?').map_or(url, |(path, _)| path);
        self.resolve(&PathRequest {
            path,
            method,
            query: QueryParams::new(),
        })
    }

    /// Builds a URL from route values using the first route able to
    pub fn url_for(&self, values: &RouteValues) -> Option<String> {
        let url = self
            .routes
            .iter()
            .find_map(|route| route.generate_url(values));
        debug!(values = %values, url = ?url, "generated url");
        url
    }

    /// Builds a URL with a specific named route
    pub fn url_for_route(&self, name: &str, values: &RouteValues) -> Option<String> {
        self.get_route_by_name(name)
            .and_then(|route| route.generate_url(values))
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, ctx: &dyn RequestContext) -> Option<RouteData> {
        RouteTable::resolve(self, ctx)
    }

    fn url_for(&self, values: &RouteValues) -> Option<String> {
        RouteTable::url_for(self, values)
    }
}

impl RouteResolver for RwLock<RouteTable> {
    fn resolve(&self, ctx: &dyn RequestContext) -> Option<RouteData> {
        let table = self.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        table.resolve(ctx)
    }

    fn url_for(&self, values: &RouteValues) -> Option<String> {
        let table = self.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        table.url_for(values)
    }
}

impl<T: RouteResolver + ?Sized> RouteResolver for &T {
    fn resolve(&self, ctx: &dyn RequestContext) -> Option<RouteData> {
        (**self).resolve(ctx)
    }

    fn url_for(&self, values: &RouteValues) -> Option<String> {
        (**self).url_for(values)
    }
}

impl<T: RouteResolver + ?Sized> RouteResolver for Arc<T> {
    fn resolve(&self, ctx: &dyn RequestContext) -> Option<RouteData> {
        (**self).resolve(ctx)
    }

    fn url_for(&self, values: &RouteValues) -> Option<String> {
        (**self).url_for(values)
    }
}
