//! The request surface the route table reads when resolving
//!
//! Only what routing needs is exposed: the app-relative path, extra path
//! info, the HTTP method, the application root and the query string, plus the
//! response-side URL transform used when generating links.

use crate::values::QueryParams;

/// Minimal request/response context consumed by [`RouteTable::resolve`](crate::RouteTable::resolve)
pub trait RequestContext {
    /// Application-relative path, conventionally starting with `~/`
    fn app_relative_path(&self) -> &str;

    /// Extra path info after the executed file; usually empty
    fn path_info(&self) -> &str {
        ""
    }

    /// HTTP method, as sent
    fn http_method(&self) -> &str;

    /// Root path the application is deployed under
    fn application_path(&self) -> &str {
        "/"
    }

    fn query(&self) -> &QueryParams;

    /// Response-side transform applied to generated URLs
    fn apply_app_path_modifier(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Bare path + method request, for resolving without a full context
#[derive(Debug, Clone)]
pub(crate) struct PathRequest<'a> {
    pub path: &'a str,
    pub method: &'a str,
    pub query: QueryParams,
}

impl RequestContext for PathRequest<'_> {
    fn app_relative_path(&self) -> &str {
        self.path
    }

    fn http_method(&self) -> &str {
        self.method
    }

    fn query(&self) -> &QueryParams {
        &self.query
    }
}
