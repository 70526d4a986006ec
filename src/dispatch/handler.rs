//! Handler capabilities and their registry.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::http::{Request, Response};
use crate::routing::HandlerRef;

/// Errors a handler may return.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler does not accept this many route parameters.
    #[error("handler expects {expected} parameter(s), got {actual}")]
    Arity { expected: usize, actual: usize },

    /// The handler ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// Executable logic behind a `Controller@action` reference.
pub trait Handler: Send + Sync {
    fn call(&self, req: &mut Request, params: &[String]) -> Result<Response, HandlerError>;
}

struct Action<F> {
    arity: usize,
    f: F,
}

impl<F> Handler for Action<F>
where
    F: Fn(&mut Request, &[String]) -> Result<Response, HandlerError> + Send + Sync,
{
    fn call(&self, req: &mut Request, params: &[String]) -> Result<Response, HandlerError> {
        if params.len() != self.arity {
            return Err(HandlerError::Arity {
                expected: self.arity,
                actual: params.len(),
            });
        }
        (self.f)(req, params)
    }
}

/// Wrap a closure as a handler taking exactly `arity` route parameters.
pub fn action<F>(arity: usize, f: F) -> impl Handler
where
    F: Fn(&mut Request, &[String]) -> Result<Response, HandlerError> + Send + Sync,
{
    Action { arity, f }
}

/// Static map from handler reference to implementation, built at startup.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<HandlerRef, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, reference: HandlerRef, handler: impl Handler + 'static) {
        self.handlers.insert(reference, Arc::new(handler));
    }

    /// Shorthand for `register(HandlerRef::new(controller, action), handler)`.
    pub fn register_action(&mut self, controller: &str, action: &str, handler: impl Handler + 'static) {
        self.register(HandlerRef::new(controller, action), handler);
    }

    pub fn resolve(&self, reference: &HandlerRef) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(reference)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_enforces_arity() {
        let handler = action(1, |_, params| Ok(Response::html(params[0].clone())));
        let mut req = Request::new("GET", "/movies/x");

        let res = handler.call(&mut req, &["x".to_string()]).unwrap();
        assert_eq!(res.body(), "x");

        match handler.call(&mut req, &[]) {
            Err(HandlerError::Arity { expected: 1, actual: 0 }) => {}
            other => panic!("expected arity error, got {:?}", other.map(|r| r.status())),
        }
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        let mut registry = HandlerRegistry::new();
        registry.register_action("HomeController", "index", action(0, |_, _| Ok(Response::html("home"))));

        assert!(registry.resolve(&"HomeController@index".parse().unwrap()).is_some());
        assert!(registry.resolve(&"HomeController@missing".parse().unwrap()).is_none());
        assert!(registry.resolve(&"NoController@index".parse().unwrap()).is_none());
    }
}
