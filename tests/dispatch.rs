//! Dispatch behaviour against hand-built route tables.

mod common;

use axum::http::Method;

use common::{handled_body, Echo};
use marquee::dispatch::DispatchContext;
use marquee::http::{Request, Response};
use marquee::middleware::Flow;
use marquee::routing::{HandlerRef, RouteError};
use marquee::Dispatcher;

fn movie_routes(literal_first: bool) -> Dispatcher {
    let builder = Dispatcher::builder()
        .handler("Movies@trending".parse().unwrap(), Echo::new("trending"))
        .handler("Movies@details".parse().unwrap(), Echo::new("details"));

    let builder = if literal_first {
        builder
            .get("/movies/trending", "Movies@trending", &[])
            .unwrap()
            .get("/movies/{title}", "Movies@details", &[])
            .unwrap()
    } else {
        builder
            .get("/movies/{title}", "Movies@details", &[])
            .unwrap()
            .get("/movies/trending", "Movies@trending", &[])
            .unwrap()
    };
    builder.build().unwrap()
}

fn dispatch(dispatcher: &Dispatcher, method: &str, uri: &str) -> Option<String> {
    let mut req = Request::new(method, uri);
    handled_body(dispatcher.dispatch(&mut req).unwrap())
}

#[test]
fn test_placeholder_values_extracted_in_order() {
    let dispatcher = Dispatcher::builder()
        .handler("Reviews@show".parse().unwrap(), Echo::new("show"))
        .get("/users/{user_id}/reviews/{slug}", "Reviews@show", &[])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        dispatch(&dispatcher, "GET", "/users/42/reviews/the-matrix_1999").as_deref(),
        Some("show:42,the-matrix_1999")
    );

    let ctx = dispatcher.resolve("/users/7/reviews/heat", "GET").unwrap();
    assert_eq!(ctx.param("user_id"), Some("7"));
    assert_eq!(ctx.param("slug"), Some("heat"));
}

#[test]
fn test_placeholder_never_spans_segments() {
    let dispatcher = movie_routes(true);
    assert_eq!(dispatch(&dispatcher, "GET", "/movies/a/b"), None);
    assert_eq!(dispatch(&dispatcher, "GET", "/movies/"), None);
}

#[test]
fn test_registration_order_decides_precedence() {
    let literal_first = movie_routes(true);
    let variable_first = movie_routes(false);

    assert_eq!(dispatch(&literal_first, "GET", "/movies/trending").as_deref(), Some("trending:"));
    assert_eq!(
        dispatch(&variable_first, "GET", "/movies/trending").as_deref(),
        Some("details:trending")
    );

    // Paths only the variable route matches are unaffected by order.
    assert_eq!(dispatch(&literal_first, "GET", "/movies/heat").as_deref(), Some("details:heat"));
    assert_eq!(dispatch(&variable_first, "GET", "/movies/heat").as_deref(), Some("details:heat"));
}

#[test]
fn test_duplicate_routes_earliest_wins() {
    let dispatcher = Dispatcher::builder()
        .handler("A@run".parse().unwrap(), Echo::new("first"))
        .handler("B@run".parse().unwrap(), Echo::new("second"))
        .get("/same", "A@run", &[])
        .unwrap()
        .get("/same", "B@run", &[])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(dispatch(&dispatcher, "GET", "/same").as_deref(), Some("first:"));
    assert_eq!(dispatcher.routes().len(), 2);
}

#[test]
fn test_trailing_slash_normalized() {
    let dispatcher = movie_routes(true);
    assert_eq!(
        dispatch(&dispatcher, "GET", "/movies/trending/"),
        dispatch(&dispatcher, "GET", "/movies/trending")
    );

    let root = Dispatcher::builder()
        .handler("Home@index".parse().unwrap(), Echo::new("home"))
        .get("/", "Home@index", &[])
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(dispatch(&root, "GET", "/").as_deref(), Some("home:"));
    assert_eq!(dispatch(&root, "GET", "/?utm=x").as_deref(), Some("home:"));
}

#[test]
fn test_query_string_ignored() {
    let dispatcher = Dispatcher::builder()
        .handler("Movies@search".parse().unwrap(), Echo::new("search"))
        .get("/movies/search", "Movies@search", &[])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(dispatch(&dispatcher, "GET", "/movies/search?q=matrix").as_deref(), Some("search:"));
    assert_eq!(
        dispatch(&dispatcher, "GET", "/movies/search?q=matrix"),
        dispatch(&dispatcher, "GET", "/movies/search")
    );
}

#[test]
fn test_halting_middleware_never_reaches_handler() {
    let handler = Echo::new("secret");
    let dispatcher = Dispatcher::builder()
        .middleware("deny", |_: &DispatchContext<'_>, _: &mut Request| {
            Flow::Halt(Response::redirect("/login"))
        })
        .handler("Vault@open".parse().unwrap(), handler.clone())
        .get("/vault", "Vault@open", &["deny"])
        .unwrap()
        .build()
        .unwrap();

    for _ in 0..3 {
        let mut req = Request::new("GET", "/vault");
        let res = dispatcher.dispatch(&mut req).unwrap().into_response();
        assert_eq!(res.header("location"), Some("/login"));
    }
    assert_eq!(handler.calls(), 0);
}

#[test]
fn test_middleware_runs_in_listed_order() {
    let dispatcher = Dispatcher::builder()
        .middleware("first", |_: &DispatchContext<'_>, req: &mut Request| {
            req.session_mut().set("trail", "first");
            Flow::Continue
        })
        .middleware("second", |_: &DispatchContext<'_>, req: &mut Request| {
            let trail = format!("{}>second", req.session().get("trail").unwrap_or_default());
            Flow::Halt(Response::html(trail))
        })
        .handler("Page@show".parse().unwrap(), Echo::new("page"))
        .get("/page", "Page@show", &["first", "second"])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(dispatch(&dispatcher, "GET", "/page").as_deref(), Some("first>second"));
}

#[test]
fn test_unmatched_path_or_method_is_not_found() {
    let dispatcher = movie_routes(true);

    let mut req = Request::new("GET", "/nonexistent");
    assert!(dispatcher.dispatch(&mut req).unwrap().is_not_found());

    let mut req = Request::new("DELETE", "/movies/trending");
    assert!(dispatcher.dispatch(&mut req).unwrap().is_not_found());

    let mut req = Request::new("get", "/movies/trending");
    assert!(dispatcher.dispatch(&mut req).unwrap().is_not_found());

    let res = dispatcher.dispatch(&mut Request::new("GET", "/nonexistent")).unwrap().into_response();
    assert_eq!(res.status().as_u16(), 404);
    assert_eq!(res.body(), "404 - Page Not Found");
}

#[test]
fn test_scheme_separator_inside_path_is_not_root() {
    let dispatcher = Dispatcher::builder()
        .handler("Home@index".parse().unwrap(), Echo::new("home"))
        .handler("Movies@details".parse().unwrap(), Echo::new("details"))
        .get("/", "Home@index", &[])
        .unwrap()
        .get("/movies/{title}", "Movies@details", &[])
        .unwrap()
        .build()
        .unwrap();

    for uri in ["/nonexistent://", "/movies://the-matrix", "/a://b/"] {
        let mut req = Request::new("GET", uri);
        assert!(dispatcher.dispatch(&mut req).unwrap().is_not_found(), "{uri} should not match");
    }
    assert_eq!(dispatch(&dispatcher, "GET", "/").as_deref(), Some("home:"));
}

#[test]
fn test_resolution_failures_look_like_routing_misses() {
    let dispatcher = Dispatcher::builder()
        .handler(
            "Movies@details".parse().unwrap(),
            marquee::dispatch::action(1, |_, params| Ok(Response::html(params[0].clone()))),
        )
        .get("/orphan", "Missing@handler", &[])
        .unwrap()
        .get("/no-params", "Movies@details", &[])
        .unwrap()
        .build()
        .unwrap();

    assert!(dispatcher.dispatch(&mut Request::new("GET", "/orphan")).unwrap().is_not_found());
    assert!(dispatcher.dispatch(&mut Request::new("GET", "/no-params")).unwrap().is_not_found());
}

#[test]
fn test_configuration_errors_fail_at_build() {
    let unknown = Dispatcher::builder()
        .get("/admin", "Admin@index", &["admin"])
        .unwrap()
        .build();
    assert!(matches!(unknown, Err(RouteError::UnknownMiddleware { ref name, .. }) if name == "admin"));

    let malformed = Dispatcher::builder().route(
        Method::GET,
        "/movies/{title",
        HandlerRef::new("Movies", "details"),
        &[],
    );
    assert!(matches!(malformed, Err(RouteError::InvalidPattern { .. })));
}
