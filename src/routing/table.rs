//! Ordered route table.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Compile each pattern as it is registered
//! - Find the first route matching a method and normalized path
//!
//! # Design Decisions
//! - Append-only while building, immutable once handed to the dispatcher
//! - O(n) scan in registration order (route tables are small)
//! - Method comparison is exact and case-sensitive

use std::fmt;
use std::str::FromStr;

use axum::http::Method;

use crate::routing::pattern::{compile, CompiledPattern};
use crate::routing::RouteError;

/// Identifies a controller action, e.g. `MovieController@details`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    pub controller: String,
    pub action: String,
}

impl HandlerRef {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

impl FromStr for HandlerRef {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = |part: &str| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        match s.split_once('@') {
            Some((controller, action)) if valid(controller) && valid(action) => {
                Ok(Self::new(controller, action))
            }
            _ => Err(RouteError::InvalidHandler(s.to_string())),
        }
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.action)
    }
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    pattern: CompiledPattern,
    handler: HandlerRef,
    middleware: Vec<String>,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path pattern as registered.
    pub fn pattern(&self) -> &str {
        self.pattern.source()
    }

    pub fn compiled(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Middleware names, in execution order.
    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern.source())
    }
}

/// Routes in registration order.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. The pattern is compiled immediately.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: HandlerRef,
        middleware: Vec<String>,
    ) -> Result<(), RouteError> {
        let compiled = compile(pattern)?;
        tracing::trace!(method = %method, pattern, handler = %handler, "Route registered");
        self.routes.push(Route {
            method,
            pattern: compiled,
            handler,
            middleware,
        });
        Ok(())
    }

    /// Register a GET route.
    pub fn get(&mut self, pattern: &str, handler: HandlerRef, middleware: Vec<String>) -> Result<(), RouteError> {
        self.add_route(Method::GET, pattern, handler, middleware)
    }

    /// Register a POST route.
    pub fn post(&mut self, pattern: &str, handler: HandlerRef, middleware: Vec<String>) -> Result<(), RouteError> {
        self.add_route(Method::POST, pattern, handler, middleware)
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route matching `method` and the already-normalized `path`,
    /// with its placeholder values.
    pub fn find(&self, method: &Method, path: &str) -> Option<(&Route, Vec<String>)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.pattern.captures(path).map(|params| (route, params)))
    }
}
