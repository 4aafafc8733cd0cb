//! Synthetic request/response context for driving route resolution
//!
//! A [`FakeHttpContext`] carries just what the route table reads: the
//! app-relative path, the HTTP method, the application root and the query
//! string. No network stack or mocking framework is involved.

use mvc_router::{CaseInsensitiveMap, QueryParams, RequestContext};
use tracing::warn;

/// Request half of a fake context
#[derive(Debug, Clone, PartialEq)]
pub struct FakeRequest {
    app_relative_path: String,
    application_path: String,
    http_method: String,
    query: QueryParams,
    server_variables: CaseInsensitiveMap,
}

impl FakeRequest {
    /// Path as given, conventionally starting with `~/`
    pub fn app_relative_path(&self) -> &str {
        &self.app_relative_path
    }

    /// Always empty: no extra path info is simulated
    pub fn path_info(&self) -> &str {
        ""
    }

    pub fn application_path(&self) -> &str {
        &self.application_path
    }

    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Always empty
    pub fn server_variables(&self) -> &CaseInsensitiveMap {
        &self.server_variables
    }
}

/// Response half of a fake context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FakeResponse;

impl FakeResponse {
    /// Echoes its input
    pub fn apply_app_path_modifier(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Fake HTTP context handed to the route table
///
/// # Examples
///
/// ```
/// use mvc_router_testing::FakeHttpContext;
///
/// let ctx = FakeHttpContext::new("~/search?q=term");
/// assert_eq!(ctx.request().app_relative_path(), "~/search");
/// assert_eq!(ctx.request().query().get("q"), Some("term"));
/// assert_eq!(ctx.request().http_method(), "GET");
///
/// let ctx = FakeHttpContext::builder("~/orders").method("POST").app_path("/shop").build();
/// assert_eq!(ctx.request().http_method(), "POST");
/// assert_eq!(ctx.request().application_path(), "/shop");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FakeHttpContext {
    request: FakeRequest,
    response: FakeResponse,
}

impl FakeHttpContext {
    /// A `GET` request for `url` under the application root `/`
    pub fn new(url: &str) -> Self {
        Self::builder(url).build()
    }

    pub fn builder(url: &str) -> FakeHttpContextBuilder {
        FakeHttpContextBuilder::new(url)
    }

    pub fn request(&self) -> &FakeRequest {
        &self.request
    }

    pub fn response(&self) -> &FakeResponse {
        &self.response
    }
}

impl RequestContext for FakeHttpContext {
    fn app_relative_path(&self) -> &str {
        self.request.app_relative_path()
    }

    fn path_info(&self) -> &str {
        self.request.path_info()
    }

    fn http_method(&self) -> &str {
        self.request.http_method()
    }

    fn application_path(&self) -> &str {
        self.request.application_path()
    }

    fn query(&self) -> &QueryParams {
        self.request.query()
    }

    fn apply_app_path_modifier(&self, url: &str) -> String {
        self.response.apply_app_path_modifier(url)
    }
}

/// Builder for [`FakeHttpContext`]; defaults to `GET` under `/`
#[derive(Debug, Clone)]
pub struct FakeHttpContextBuilder {
    url: String,
    app_path: String,
    method: String,
}

impl FakeHttpContextBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            app_path: "/".to_string(),
            method: "GET".to_string(),
        }
    }

    /// Application root the request is served under
    pub fn app_path(mut self, app_path: impl Into<String>) -> Self {
        self.app_path = app_path.into();
        self
    }

    /// HTTP method, stored verbatim
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Builds the context; never fails
    pub fn build(self) -> FakeHttpContext {
        let (path, query) = match self.url.split_once('?') {
            Some((path, query)) => (path.to_string(), parse_query_string(query)),
            None => (self.url, QueryParams::new()),
        };

        FakeHttpContext {
            request: FakeRequest {
                app_relative_path: path,
                application_path: self.app_path,
                http_method: self.method,
                query,
                server_variables: CaseInsensitiveMap::new(),
            },
            response: FakeResponse,
        }
    }
}

/// Parses `application/x-www-form-urlencoded` pairs
///
/// `+` is a space and `%XX` escapes are decoded. Repeated keys are joined
/// with `,` and a pair without `=` gets an empty value. A malformed query
/// (a `%` not followed by two hex digits, or escapes that do not decode to
/// UTF-8) yields an empty map.
///
/// # Examples
///
/// ```
/// use mvc_router_testing::parse_query_string;
///
/// let query = parse_query_string("q=rust+lang&tag=a&tag=b&flag");
/// assert_eq!(query.get("q"), Some("rust lang"));
/// assert_eq!(query.get("tag"), Some("a,b"));
/// assert_eq!(query.get("flag"), Some(""));
///
/// assert!(parse_query_string("q=%FF").is_empty());
/// assert!(parse_query_string("q=%ZZ").is_empty());
/// ```
pub fn parse_query_string(query: &str) -> QueryParams {
    let mut params = QueryParams::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let decoded = decode_component(key).zip(decode_component(value));
        let Some((key, value)) = decoded else {
            warn!(query, "malformed query string, ignoring it");
            return QueryParams::new();
        };
        if !key.is_empty() {
            params.append(key, value);
        }
    }

    params
}

fn decode_component(component: &str) -> Option<String> {
    if !has_valid_escapes(component) {
        return None;
    }
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|decoded| decoded.into_owned())
}

/// Every `%` starts a two hex digit escape
fn has_valid_escapes(component: &str) -> bool {
    let bytes = component.as_bytes();
    bytes.iter().enumerate().all(|(i, &byte)| {
        byte != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}
