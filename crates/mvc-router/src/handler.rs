use std::fmt;

/// Strategy selected for a matched route
///
/// The set is closed: a route either dispatches to a controller action,
/// redirects, serves a static page, or tells the router to stop.
///
/// # Examples
///
/// ```
/// use mvc_router::{HandlerKind, RouteHandler};
///
/// let handler = RouteHandler::Redirect { target: "/articles".to_string() };
/// assert_eq!(handler.kind(), HandlerKind::Redirect);
/// assert_eq!(handler.redirect_target(), Some("/articles"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteHandler {
    /// Normal controller/action dispatch
    Mvc,
    /// Redirect to another URL
    Redirect { target: String },
    /// Serve a page at a virtual path (e.g. `~/legacy/about.aspx`)
    Page { virtual_path: String },
    /// Blocked/ignored: the router declines to dispatch this URL
    Stop,
}

/// Discriminant of [`RouteHandler`], used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Mvc,
    Redirect,
    Page,
    Stop,
}

impl RouteHandler {
    pub fn kind(&self) -> HandlerKind {
        match self {
            RouteHandler::Mvc => HandlerKind::Mvc,
            RouteHandler::Redirect { .. } => HandlerKind::Redirect,
            RouteHandler::Page { .. } => HandlerKind::Page,
            RouteHandler::Stop => HandlerKind::Stop,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            RouteHandler::Redirect { target } => Some(target),
            _ => None,
        }
    }

    pub fn virtual_path(&self) -> Option<&str> {
        match self {
            RouteHandler::Page { virtual_path } => Some(virtual_path),
            _ => None,
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandlerKind::Mvc => "mvc dispatch",
            HandlerKind::Redirect => "redirect",
            HandlerKind::Page => "page",
            HandlerKind::Stop => "stop-routing",
        })
    }
}
