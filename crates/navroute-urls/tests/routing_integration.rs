//! Integration tests for route registration, resolution, and reverse
//! generation working together.

use navroute_core::settings_loader;
use navroute_core::RouterError;
use navroute_urls::{RouteDefinition, RouteParams, RouteTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    User,
    UserPosts,
    Docs,
    NotFound,
}

fn app_routes() -> RouteTable<Page> {
    RouteTable::register(vec![
        RouteDefinition::new(Page::Home, "/"),
        RouteDefinition::new(Page::User, "/users/:id"),
        RouteDefinition::new(Page::UserPosts, "/users/:id/posts(/<int:page>)"),
        RouteDefinition::new(Page::Docs, "/docs/*path"),
    ])
    .unwrap()
}

fn params(pairs: &[(&str, &str)]) -> RouteParams {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ═════════════════════════════════════════════════════════════════════
// 1. Enum route names resolve like string names
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_enum_names_resolve() {
    let table = app_routes();

    let data = table.resolve("/users/42", &Page::NotFound);
    assert_eq!(data.name, Page::User);
    assert_eq!(data.params, params(&[("id", "42")]));

    let data = table.resolve("/users/42/posts/3", &Page::NotFound);
    assert_eq!(data.name, Page::UserPosts);
    assert_eq!(data.params, params(&[("id", "42"), ("page", "3")]));

    let data = table.resolve("/docs/guide/intro.md", &Page::NotFound);
    assert_eq!(data.name, Page::Docs);
    assert_eq!(data.param("path"), Some("guide/intro.md"));

    let data = table.resolve("/settings", &Page::NotFound);
    assert_eq!(data.name, Page::NotFound);
    assert_eq!(data.pathname, "/settings");
}

// ═════════════════════════════════════════════════════════════════════
// 2. Pathname identity holds for every input
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_resolved_pathname_is_input() {
    let table = app_routes();
    for pathname in ["/", "/users/1", "/users/1/posts", "/docs/x", "/x/y/z", "", "//"] {
        assert_eq!(table.resolve(pathname, &Page::NotFound).pathname, pathname);
    }
}

// ═════════════════════════════════════════════════════════════════════
// 3. Reverse then resolve returns the same route and params
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_reverse_then_resolve() {
    let table = app_routes();
    let cases = [
        (Page::Home, params(&[])),
        (Page::User, params(&[("id", "ann marie")])),
        (Page::UserPosts, params(&[("id", "7")])),
        (Page::UserPosts, params(&[("id", "7"), ("page", "2")])),
        (Page::Docs, params(&[("path", "a/b/c")])),
    ];

    for (name, p) in cases {
        let url = table.reverse(&name, &p).unwrap();
        let data = table.resolve(&url, &Page::NotFound);
        assert_eq!(data.name, name, "{url}");
        assert_eq!(data.params, p, "{url}");
    }
}

#[test]
fn test_reverse_failures_are_navigation_errors() {
    let table = app_routes();

    let err = table.reverse(&Page::User, &params(&[])).unwrap_err();
    assert!(matches!(err, RouterError::ParamsMismatch { .. }));
    assert!(err.is_navigation());

    let err = table.reverse(&Page::NotFound, &params(&[])).unwrap_err();
    assert!(matches!(err, RouterError::UnknownRouteName(ref n) if n == "NotFound"));
}

// ═════════════════════════════════════════════════════════════════════
// 4. Routes loaded from settings
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_routes_from_toml_settings() {
    let settings = settings_loader::from_toml_str(
        r#"
        unknown_route_name = "missing"

        [[routes]]
        name = "home"
        spec = "/"

        [[routes]]
        name = "user"
        spec = "/users/:id"
        "#,
    )
    .unwrap();

    let table =
        RouteTable::register(settings.routes.into_iter().map(RouteDefinition::from)).unwrap();
    assert_eq!(table.len(), 2);

    let unknown = settings.unknown_route_name;
    assert_eq!(table.resolve("/users/9", &unknown).name, "user");
    assert_eq!(table.resolve("/nope", &unknown).name, "missing");
}

#[test]
fn test_duplicate_routes_in_settings() {
    let settings = settings_loader::from_json_str(
        r#"{"routes": [
            {"name": "user", "spec": "/users/:id"},
            {"name": "user", "spec": "/u/:id"}
        ]}"#,
    )
    .unwrap();

    let err = RouteTable::register(settings.routes.into_iter().map(RouteDefinition::from))
        .unwrap_err();
    assert!(err.is_configuration());
    let message = err.to_string();
    assert!(message.contains("\"user\""));
    assert!(message.contains("/users/:id"));
    assert!(message.contains("/u/:id"));
}
