//! Integration tests for mvc-router
//!
//! Tests are organized by feature area:
//! - Default route and defaults
//! - Literal, parameter, catch-all and complex segments
//! - Constraints (regex and HTTP method)
//! - Ignore, redirect and page routes
//! - URL generation and round trips
//! - Named routes

use mvc_router::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn default_table() -> RouteTable {
    RouteTable::with_default_route()
}

// ============================================================================
// Default Route
// ============================================================================

#[test]
fn test_root_resolves_to_home_index() {
    let data = default_table().resolve_path("GET", "~/").unwrap();
    assert_eq!(data.controller(), Some("home"));
    assert_eq!(data.action(), Some("index"));
    assert_eq!(data.value("id"), None);
    assert_eq!(data.handler, RouteHandler::Mvc);
}

#[rstest]
#[case("~/products", "products", "index", None)]
#[case("~/products/list", "products", "list", None)]
#[case("~/products/show/5", "products", "show", Some("5"))]
#[case("~/Products/Show/5/", "Products", "Show", Some("5"))]
fn test_default_route_fills_defaults(
    #[case] url: &str,
    #[case] controller: &str,
    #[case] action: &str,
    #[case] id: Option<&str>,
) {
    let data = default_table().resolve_path("GET", url).unwrap();
    assert_eq!(data.controller(), Some(controller));
    assert_eq!(data.action(), Some(action));
    assert_eq!(data.value("id"), id);
}

#[test]
fn test_too_many_segments_do_not_match() {
    assert!(default_table().resolve_path("GET", "~/a/b/c/d").is_none());
}

#[test]
fn test_query_string_is_not_a_route_value() {
    let data = default_table()
        .resolve_path("GET", "~/search/index?q=term")
        .unwrap();
    assert_eq!(data.controller(), Some("search"));
    assert_eq!(data.value("q"), None);
}

#[test]
fn test_controller_with_id_pattern_and_default_action() {
    let table = RouteTable::new().with_route(
        Route::new("{controller}/{id}")
            .unwrap()
            .with_default("action", "Index"),
    );

    let data = table.resolve_path("GET", "~/products/5").unwrap();
    assert_eq!(
        data.values,
        RouteValues::from([("controller", "products"), ("id", "5"), ("action", "Index")])
    );
}

#[test]
fn test_route_value_lookup_ignores_case() {
    let data = default_table().resolve_path("GET", "~/products/show/5").unwrap();
    for key in ["Action", "action", "ACTION"] {
        assert_eq!(data.value(key), Some("show"));
    }
    for key in ["Missing", "missing"] {
        assert_eq!(data.value(key), None);
    }
}

// ============================================================================
// Segments
// ============================================================================

#[test]
fn test_literal_segments_ignore_case() {
    let table = RouteTable::new().with_route(
        Route::new("shop/{category}")
            .unwrap()
            .with_defaults([("controller", "shop"), ("action", "category")]),
    );

    let data = table.resolve_path("GET", "~/SHOP/books").unwrap();
    assert_eq!(data.value("category"), Some("books"));
}

#[test]
fn test_path_segments_are_percent_decoded() {
    let data = default_table()
        .resolve_path("GET", "~/search/find/hello%20world")
        .unwrap();
    assert_eq!(data.value("id"), Some("hello world"));
}

#[test]
fn test_catch_all() {
    let table = RouteTable::new().with_route(
        Route::new("docs/{*path}")
            .unwrap()
            .with_defaults([("controller", "docs"), ("action", "page")]),
    );

    let data = table.resolve_path("GET", "~/docs/guide/getting-started").unwrap();
    assert_eq!(data.value("path"), Some("guide/getting-started"));

    // Catch-all may be empty
    let data = table.resolve_path("GET", "~/docs").unwrap();
    assert_eq!(data.value("path"), None);
}

#[test]
fn test_complex_segment() {
    let table = RouteTable::new().with_route(
        Route::new("files/{name}.{ext}")
            .unwrap()
            .with_defaults([("controller", "files"), ("action", "download")]),
    );

    let data = table.resolve_path("GET", "~/files/report.final.pdf").unwrap();
    assert_eq!(data.value("name"), Some("report.final"));
    assert_eq!(data.value("ext"), Some("pdf"));

    assert!(table.resolve_path("GET", "~/files/report").is_none());
}

#[test]
fn test_first_registered_route_wins() {
    let table = RouteTable::new()
        .with_route(
            Route::new("products/{id}")
                .unwrap()
                .with_defaults([("controller", "catalog"), ("action", "item")]),
        )
        .with_route(Route::default_mvc());

    let data = table.resolve_path("GET", "~/products/5").unwrap();
    assert_eq!(data.controller(), Some("catalog"));
}

// ============================================================================
// Constraints
// ============================================================================

#[test]
fn test_regex_constraint() {
    let table = RouteTable::new().with_route(
        Route::new("archive/{year}")
            .unwrap()
            .with_defaults([("controller", "archive"), ("action", "year")])
            .with_constraint("year", r"\d{4}")
            .unwrap(),
    );

    assert!(table.resolve_path("GET", "~/archive/2024").is_some());
    assert!(table.resolve_path("GET", "~/archive/24").is_none());
    assert!(table.resolve_path("GET", "~/archive/latest").is_none());
}

#[test]
fn test_constraint_on_absent_optional_parameter_is_skipped() {
    let table = RouteTable::new().with_route(
        Route::default_mvc().with_constraint("id", "int").unwrap(),
    );

    assert!(table.resolve_path("GET", "~/products/show").is_some());
    assert!(table.resolve_path("GET", "~/products/show/5").is_some());
    assert!(table.resolve_path("GET", "~/products/show/five").is_none());
}

#[test]
fn test_post_to_get_only_route_does_not_match() {
    let table = RouteTable::new().with_route(
        Route::new("account/login")
            .unwrap()
            .with_defaults([("controller", "account"), ("action", "login")])
            .with_methods(["GET"]),
    );

    assert!(table.resolve_path("GET", "~/account/login").is_some());
    assert!(table.resolve_path("get", "~/account/login").is_some());
    assert!(table.resolve_path("POST", "~/account/login").is_none());
}

// ============================================================================
// Ignore, Redirect and Page Routes
// ============================================================================

#[test]
fn test_ignore_route() {
    let mut table = RouteTable::new();
    table.ignore_route("blocked-path").unwrap();
    table.add_route(Route::default_mvc());

    let data = table.resolve_path("GET", "~/blocked-path").unwrap();
    assert_eq!(data.handler, RouteHandler::Stop);
    assert_eq!(data.handler.kind(), HandlerKind::Stop);

    let data = table.resolve_path("GET", "~/other-path").unwrap();
    assert_eq!(data.handler, RouteHandler::Mvc);
}

#[test]
fn test_redirect_route_substitutes_values() {
    let table = RouteTable::new()
        .with_route(Route::redirect("blog/{year}/{slug}", "/articles/{slug}?y={year}").unwrap());

    let data = table.resolve_path("GET", "~/blog/2024/hello").unwrap();
    assert_eq!(
        data.handler,
        RouteHandler::Redirect {
            target: "/articles/hello?y=2024".to_string()
        }
    );
}

#[test]
fn test_page_route() {
    let table = RouteTable::new()
        .with_route(Route::page("legacy/{page}", "~/legacy/page.aspx").unwrap());

    let data = table.resolve_path("GET", "~/legacy/about").unwrap();
    assert_eq!(data.handler.virtual_path(), Some("~/legacy/page.aspx"));
    assert_eq!(data.value("page"), Some("about"));
}

// ============================================================================
// URL Generation
// ============================================================================

#[rstest]
#[case(&[("controller", "home"), ("action", "index")], "/")]
#[case(&[("controller", "products"), ("action", "index")], "/products")]
#[case(&[("controller", "products"), ("action", "show"), ("id", "5")], "/products/show/5")]
#[case(&[("controller", "products"), ("action", "index"), ("id", "5")], "/products/index/5")]
#[case(&[("controller", "search"), ("action", "index"), ("q", "a&b")], "/search?q=a%26b")]
fn test_url_for(#[case] values: &[(&str, &str)], #[case] expected: &str) {
    let values: RouteValues = values.iter().copied().collect();
    assert_eq!(default_table().url_for(&values), Some(expected.to_string()));
}

#[test]
fn test_url_for_skips_routes_with_conflicting_defaults() {
    let table = RouteTable::new()
        .with_route(
            Route::new("about")
                .unwrap()
                .with_defaults([("controller", "home"), ("action", "about")]),
        )
        .with_route(Route::default_mvc());

    let about = RouteValues::from([("controller", "home"), ("action", "about")]);
    assert_eq!(table.url_for(&about), Some("/about".to_string()));

    let index = RouteValues::from([("controller", "home"), ("action", "index")]);
    assert_eq!(table.url_for(&index), Some("/".to_string()));
}

#[test]
fn test_url_for_skips_non_mvc_routes() {
    let table = RouteTable::new()
        .with_route(Route::ignore("{controller}/{action}").unwrap())
        .with_route(Route::default_mvc());

    let values = RouteValues::from([("controller", "products"), ("action", "list")]);
    assert_eq!(table.url_for(&values), Some("/products/list".to_string()));
}

#[test]
fn test_url_for_respects_constraints() {
    let table = RouteTable::new().with_route(
        Route::new("archive/{year}")
            .unwrap()
            .with_defaults([("controller", "archive"), ("action", "year")])
            .with_constraint("year", r"\d{4}")
            .unwrap(),
    );

    let ok = RouteValues::from([("controller", "archive"), ("action", "year"), ("year", "2024")]);
    assert_eq!(table.url_for(&ok), Some("/archive/2024".to_string()));

    let bad = RouteValues::from([("controller", "archive"), ("action", "year"), ("year", "soon")]);
    assert_eq!(table.url_for(&bad), None);
}

#[test]
fn test_url_round_trip() {
    let table = RouteTable::new()
        .with_route(Route::ignore("{resource}.axd/{*pathInfo}").unwrap())
        .with_route(
            Route::new("docs/{*path}")
                .unwrap()
                .with_defaults([("controller", "docs"), ("action", "page")]),
        )
        .with_route(Route::default_mvc());

    let cases = [
        RouteValues::from([("controller", "home"), ("action", "index")]),
        RouteValues::from([("controller", "products"), ("action", "show"), ("id", "42")]),
        RouteValues::from([("controller", "search"), ("action", "find"), ("id", "hello world")]),
        RouteValues::from([("controller", "docs"), ("action", "page"), ("path", "guide/intro")]),
    ];

    for values in cases {
        let url = table.url_for(&values).unwrap();
        let data = table.resolve_path("GET", &format!("~{}", url)).unwrap();
        assert_eq!(data.values, values, "round trip through {}", url);
    }
}

// ============================================================================
// Named Routes
// ============================================================================

#[test]
fn test_url_for_named_route() {
    let mut table = RouteTable::new();
    table
        .map_route("Product", "p/{id}", [("controller", "products"), ("action", "show")])
        .unwrap()
        .map_route(
            "Default",
            "{controller}/{action}/{id}",
            [("controller", "home"), ("action", "index"), ("id", "")],
        )
        .unwrap();

    let values = RouteValues::from([("controller", "products"), ("action", "show"), ("id", "9")]);
    assert_eq!(table.url_for(&values), Some("/p/9".to_string()));
    assert_eq!(
        table.url_for_route("Default", &values),
        Some("/products/show/9".to_string())
    );
    assert_eq!(table.url_for_route("Missing", &values), None);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_patterns_are_rejected() {
    assert!(matches!(
        Route::new("~/home"),
        Err(RouteError::InvalidPattern { .. })
    ));
    assert!(matches!(
        Route::new("{*all}/more"),
        Err(RouteError::CatchAllNotLast { .. })
    ));
    assert!(matches!(
        Route::new("{id}/{Id}"),
        Err(RouteError::DuplicateParameter { .. })
    ));
}

#[test]
fn test_global_table_is_shared() {
    {
        let mut table = RouteTable::global().write().unwrap();
        if table.get_route_by_name("Default").is_none() {
            table.add_route(Route::default_mvc());
        }
    }

    let request = GetRequest {
        path: "~/",
        query: QueryParams::new(),
    };
    let data = RouteResolver::resolve(RouteTable::global(), &request).unwrap();
    assert_eq!(data.controller(), Some("home"));
}

struct GetRequest {
    path: &'static str,
    query: QueryParams,
}

impl RequestContext for GetRequest {
    fn app_relative_path(&self) -> &str {
        self.path
    }

    fn http_method(&self) -> &str {
        "GET"
    }

    fn query(&self) -> &QueryParams {
        &self.query
    }
}
