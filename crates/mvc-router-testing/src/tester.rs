//! Resolving URLs against a chosen route table, and building URLs back
//!
//! [`RouteTester`] is the fixture a route test module keeps around: it owns
//! (or borrows) a resolver and hands out [`ResolvedRoute`]s for `GET`/`POST`
//! requests. Its [`UrlHelper`] is built on first use.

use std::sync::{Arc, RwLock};

use mvc_router::{RouteResolver, RouteTable, RouteValues, ACTION_KEY, CONTROLLER_KEY};
use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::assertions::ResolvedRoute;
use crate::fake_context::FakeHttpContext;

/// Resolves one URL with the given method against any resolver
pub fn resolve_with<R>(resolver: &R, method: &str, url: &str) -> ResolvedRoute
where
    R: RouteResolver + ?Sized,
{
    let ctx = FakeHttpContext::builder(url).method(method).build();
    let data = resolver.resolve(&ctx);
    debug!(url, method, matched = data.is_some(), "resolved test url");
    ResolvedRoute::new(url, data)
}

// ============================================================================
// Route Tester
// ============================================================================

/// Test fixture bound to one resolver
///
/// # Examples
///
/// ```
/// use mvc_router::RouteTable;
/// use mvc_router_testing::{action, RouteAssertions, RouteTester};
///
/// struct ProductsController;
///
/// let tester = RouteTester::from_table(RouteTable::with_default_route());
///
/// tester
///     .get("~/products/show/5")
///     .should_map_to(action!(ProductsController => show(id = 5)));
///
/// let url = tester.url().action("show", "products");
/// assert_eq!(url.as_deref(), Some("/products/show"));
/// ```
pub struct RouteTester<R = &'static RwLock<RouteTable>> {
    resolver: R,
    app_path: String,
    url: OnceCell<UrlHelper<R>>,
}

impl RouteTester {
    /// Tester over the process-wide route table
    pub fn new() -> Self {
        Self::with_resolver(RouteTable::global())
    }
}

impl Default for RouteTester {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTester<Arc<RouteTable>> {
    /// Tester over a table of its own, isolated from other tests
    pub fn from_table(table: RouteTable) -> Self {
        Self::with_resolver(Arc::new(table))
    }
}

impl<R: RouteResolver + Clone> RouteTester<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            app_path: "/".to_string(),
            url: OnceCell::new(),
        }
    }

    /// Application root used by [`url`](Self::url)
    pub fn with_app_path(mut self, app_path: impl Into<String>) -> Self {
        self.app_path = app_path.into();
        self.url = OnceCell::new();
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn get(&self, url: &str) -> ResolvedRoute {
        self.request("GET", url)
    }

    pub fn post(&self, url: &str) -> ResolvedRoute {
        self.request("POST", url)
    }

    pub fn request(&self, method: &str, url: &str) -> ResolvedRoute {
        resolve_with(&self.resolver, method, url)
    }

    /// URL helper over the same resolver, built on first use
    pub fn url(&self) -> &UrlHelper<R> {
        self.url
            .get_or_init(|| UrlHelper::with_app_path(self.resolver.clone(), &self.app_path))
    }
}

// ============================================================================
// URL Helper
// ============================================================================

/// Builds URLs from route values, as a view rendered for `~/` would
///
/// Ambient values are `controller=home, action=index`; they fill in whichever
/// of the two the caller leaves out.
pub struct UrlHelper<R> {
    resolver: R,
    context: FakeHttpContext,
    ambient: RouteValues,
}

impl<R: RouteResolver> UrlHelper<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_app_path(resolver, "/")
    }

    pub fn with_app_path(resolver: R, app_path: &str) -> Self {
        Self {
            resolver,
            context: FakeHttpContext::builder("~/").app_path(app_path).build(),
            ambient: RouteValues::from([(CONTROLLER_KEY, "home"), (ACTION_KEY, "index")]),
        }
    }

    pub fn ambient_values(&self) -> &RouteValues {
        &self.ambient
    }

    /// The fake `~/` context the helper renders for
    pub fn context(&self) -> &FakeHttpContext {
        &self.context
    }

    /// URL for the values, under the application root
    ///
    /// # Examples
    ///
    /// ```
    /// use mvc_router::{RouteTable, RouteValues};
    /// use mvc_router_testing::UrlHelper;
    ///
    /// let table = RouteTable::with_default_route();
    /// let helper = UrlHelper::with_app_path(&table, "/shop");
    ///
    /// let values = RouteValues::from([("controller", "products"), ("id", "5"), ("action", "show")]);
    /// assert_eq!(helper.route_url(&values).as_deref(), Some("/shop/products/show/5"));
    ///
    /// let values = RouteValues::from([("action", "about")]);
    /// assert_eq!(helper.route_url(&values).as_deref(), Some("/shop/home/about"));
    /// ```
    pub fn route_url(&self, values: &RouteValues) -> Option<String> {
        let mut values = values.clone();
        for key in [CONTROLLER_KEY, ACTION_KEY] {
            if !values.contains_key(key) {
                if let Some(ambient) = self.ambient.get(key) {
                    values.insert(key, ambient);
                }
            }
        }

        let relative = self.resolver.url_for(&values)?;
        let app_path = self.context.request().application_path().trim_end_matches('/');
        let url = format!("{}{}", app_path, relative);

        Some(self.context.response().apply_app_path_modifier(&url))
    }

    /// URL for an action on a controller
    pub fn action(&self, action: &str, controller: &str) -> Option<String> {
        self.route_url(&RouteValues::from([(CONTROLLER_KEY, controller), (ACTION_KEY, action)]))
    }
}
