//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Normalize the incoming URI
//! - Look up the first matching route
//! - Run the route's middleware, then its handler
//! - Collapse every kind of miss into `Outcome::NotFound`
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Configuration errors surface from `RouterBuilder::build`, never per request
//! - Explicit NotFound rather than silent default

use axum::http::Method;
use thiserror::Error;

use crate::dispatch::handler::{Handler, HandlerError, HandlerRegistry};
use crate::http::{Request, Response};
use crate::middleware::{run_chain, Flow, Middleware, MiddlewareRegistry};
use crate::routing::{HandlerRef, Route, RouteError, RouteTable};

/// Terminal state of a dispatched request.
#[derive(Debug)]
pub enum Outcome {
    /// A middleware or the handler produced this response.
    Handled(Response),
    /// No route, no handler, or the handler rejected the parameters.
    NotFound,
}

impl Outcome {
    /// The response to send, rendering `NotFound` as the canonical 404 page.
    pub fn into_response(self) -> Response {
        match self {
            Outcome::Handled(response) => response,
            Outcome::NotFound => Response::not_found(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }
}

/// A handler failed after it was successfully resolved.
#[derive(Debug, Error)]
#[error("handler `{handler}` failed: {source}")]
pub struct DispatchError {
    pub handler: HandlerRef,
    #[source]
    pub source: HandlerError,
}

/// Request-scoped match data handed to middleware.
#[derive(Debug, Clone)]
pub struct DispatchContext<'a> {
    pub route: &'a Route,
    /// Placeholder values aligned with `route.compiled().placeholders()`.
    pub params: Vec<String>,
    pub method: String,
    /// Normalized path the route matched.
    pub path: String,
}

impl DispatchContext<'_> {
    /// Value of the named placeholder.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route
            .compiled()
            .placeholders()
            .iter()
            .position(|p| p == name)
            .and_then(|i| self.params.get(i))
            .map(String::as_str)
    }
}

/// Strip query string and fragment, the scheme and authority of an absolute
/// URI, and a single trailing `/` unless the path is the root.
///
/// Only a URI that does not start with `/` is treated as absolute, so an
/// origin-form path keeps any `://` it contains.
pub fn normalize_path(uri: &str) -> &str {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    let mut path = &uri[..end];

    if !path.starts_with('/') {
        if let Some(scheme_end) = path.find("://") {
            let rest = &path[scheme_end + 3..];
            path = rest.find('/').map(|i| &rest[i..]).unwrap_or("");
        }
    }

    if path.is_empty() {
        return "/";
    }
    if path != "/" {
        if let Some(stripped) = path.strip_suffix('/') {
            return stripped;
        }
    }
    path
}

/// Collects middleware, handlers and routes, then validates them into a [`Dispatcher`].
#[derive(Debug, Default)]
pub struct RouterBuilder {
    routes: RouteTable,
    middleware: MiddlewareRegistry,
    handlers: HandlerRegistry,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn middleware(mut self, name: impl Into<String>, middleware: impl Middleware + 'static) -> Self {
        self.middleware.register(name, middleware);
        self
    }

    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn handler(mut self, reference: HandlerRef, handler: impl Handler + 'static) -> Self {
        self.handlers.register(reference, handler);
        self
    }

    /// Register a route; a malformed pattern fails here.
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        handler: HandlerRef,
        middleware: &[&str],
    ) -> Result<Self, RouteError> {
        let middleware = middleware.iter().map(|m| m.to_string()).collect();
        self.routes.add_route(method, pattern, handler, middleware)?;
        Ok(self)
    }

    pub fn get(self, pattern: &str, handler: &str, middleware: &[&str]) -> Result<Self, RouteError> {
        self.route(Method::GET, pattern, handler.parse()?, middleware)
    }

    pub fn post(self, pattern: &str, handler: &str, middleware: &[&str]) -> Result<Self, RouteError> {
        self.route(Method::POST, pattern, handler.parse()?, middleware)
    }

    /// Register a route with already-owned middleware names (config-driven tables).
    pub fn route_owned(
        mut self,
        method: Method,
        pattern: &str,
        handler: HandlerRef,
        middleware: Vec<String>,
    ) -> Result<Self, RouteError> {
        self.routes.add_route(method, pattern, handler, middleware)?;
        Ok(self)
    }

    /// Validate and freeze.
    ///
    /// Every middleware name used by a route must be registered. Handler
    /// references are not required to resolve; unresolved ones dispatch as 404.
    pub fn build(self) -> Result<Dispatcher, RouteError> {
        for route in self.routes.routes() {
            for name in route.middleware() {
                if !self.middleware.contains(name) {
                    return Err(RouteError::UnknownMiddleware {
                        method: route.method().to_string(),
                        pattern: route.pattern().to_string(),
                        name: name.clone(),
                    });
                }
            }
            if self.handlers.resolve(route.handler()).is_none() {
                tracing::warn!(route = %route, handler = %route.handler(), "Route handler is not registered; it will answer 404");
            }
        }

        tracing::info!(
            routes = self.routes.len(),
            handlers = self.handlers.len(),
            middleware = ?self.middleware.names().collect::<Vec<_>>(),
            "Router built"
        );

        Ok(Dispatcher {
            routes: self.routes,
            middleware: self.middleware,
            handlers: self.handlers,
        })
    }
}

/// Matches requests against the frozen route table and runs them.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    middleware: MiddlewareRegistry,
    handlers: HandlerRegistry,
}

impl Dispatcher {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Route] {
        self.routes.routes()
    }

    /// Find the route a request would dispatch to, without running anything.
    pub fn resolve(&self, uri: &str, method: &str) -> Option<DispatchContext<'_>> {
        let method = Method::from_bytes(method.as_bytes()).ok()?;
        let path = normalize_path(uri);
        let (route, params) = self.routes.find(&method, path)?;
        Some(DispatchContext {
            route,
            params,
            method: method.to_string(),
            path: path.to_string(),
        })
    }

    /// Dispatch a request.
    ///
    /// Returns `Err` only when a resolved handler fails for a reason other
    /// than its parameter count.
    pub fn dispatch(&self, req: &mut Request) -> Result<Outcome, DispatchError> {
        let Some(ctx) = self.resolve(req.uri(), req.method()) else {
            tracing::debug!(
                request_id = %req.request_id(),
                method = %req.method(),
                uri = %req.uri(),
                "No route matched"
            );
            return Ok(Outcome::NotFound);
        };

        tracing::debug!(
            request_id = %req.request_id(),
            route = %ctx.route,
            handler = %ctx.route.handler(),
            params = ?ctx.params,
            "Route matched"
        );
        req.set_matched_route(ctx.route.pattern());

        if let Flow::Halt(response) = run_chain(&self.middleware, &ctx, req) {
            return Ok(Outcome::Handled(response));
        }

        let reference = ctx.route.handler();
        let Some(handler) = self.handlers.resolve(reference) else {
            tracing::debug!(handler = %reference, "Handler not registered");
            return Ok(Outcome::NotFound);
        };

        match handler.call(req, &ctx.params) {
            Ok(response) => Ok(Outcome::Handled(response)),
            Err(HandlerError::Arity { expected, actual }) => {
                tracing::debug!(handler = %reference, expected, actual, "Handler rejected parameters");
                Ok(Outcome::NotFound)
            }
            Err(source) => Err(DispatchError {
                handler: reference.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler::action;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/movies/trending/"), "/movies/trending");
        assert_eq!(normalize_path("/movies/search?q=matrix"), "/movies/search");
        assert_eq!(normalize_path("/movies/search/?q=matrix"), "/movies/search");
        assert_eq!(normalize_path("/login#form"), "/login");
        assert_eq!(normalize_path("?q=x"), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/a//"), "/a/");
        assert_eq!(normalize_path("http://localhost:8080/watchlist/?x=1"), "/watchlist");
        assert_eq!(normalize_path("http://localhost:8080"), "/");
        assert_eq!(normalize_path("/a://b"), "/a://b");
        assert_eq!(normalize_path("/nonexistent://"), "/nonexistent:/");
        assert_eq!(normalize_path("/movies://the-matrix?x=1"), "/movies://the-matrix");
    }

    #[test]
    fn test_dispatch_records_matched_route() {
        let dispatcher = Dispatcher::builder()
            .handler(
                "MovieController@details".parse().unwrap(),
                action(1, |_, _| Ok(Response::html("ok"))),
            )
            .get("/movies/{title}", "MovieController@details", &[])
            .unwrap()
            .build()
            .unwrap();

        let mut req = Request::new("GET", "/movies/heat?ref=home");
        assert!(!dispatcher.dispatch(&mut req).unwrap().is_not_found());
        assert_eq!(req.matched_route(), Some("/movies/{title}"));

        let mut req = Request::new("GET", "/nowhere");
        assert!(dispatcher.dispatch(&mut req).unwrap().is_not_found());
        assert_eq!(req.matched_route(), None);
    }

    #[test]
    fn test_param_lookup_by_name() {
        let dispatcher = Dispatcher::builder()
            .get("/users/{user}/lists/{list}", "ListController@show", &[])
            .unwrap()
            .build()
            .unwrap();

        let ctx = dispatcher.resolve("/users/ana/lists/7", "GET").unwrap();
        assert_eq!(ctx.param("user"), Some("ana"));
        assert_eq!(ctx.param("list"), Some("7"));
        assert_eq!(ctx.param("missing"), None);
    }

    #[test]
    fn test_method_comparison_is_case_sensitive() {
        let dispatcher = Dispatcher::builder()
            .get("/login", "AuthController@showLogin", &[])
            .unwrap()
            .build()
            .unwrap();

        assert!(dispatcher.resolve("/login", "GET").is_some());
        assert!(dispatcher.resolve("/login", "get").is_none());
        assert!(dispatcher.resolve("/login", "NOT A METHOD").is_none());
    }

    #[test]
    fn test_unknown_middleware_fails_build() {
        let err = Dispatcher::builder()
            .get("/watchlist", "WatchlistController@index", &["auth"])
            .unwrap()
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            RouteError::UnknownMiddleware {
                method: "GET".into(),
                pattern: "/watchlist".into(),
                name: "auth".into(),
            }
        );
    }

    #[test]
    fn test_handler_failure_is_error_not_404() {
        let dispatcher = Dispatcher::builder()
            .handler(
                "HomeController@index".parse().unwrap(),
                action(0, |_, _| Err(HandlerError::Failed("boom".into()))),
            )
            .get("/", "HomeController@index", &[])
            .unwrap()
            .build()
            .unwrap();

        let err = dispatcher.dispatch(&mut Request::new("GET", "/")).unwrap_err();
        assert_eq!(err.handler.to_string(), "HomeController@index");
        assert!(err.to_string().contains("boom"));
    }
}
