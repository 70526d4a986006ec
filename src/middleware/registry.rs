//! Named middleware registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::middleware::Middleware;

/// Maps middleware names to implementations. Filled at startup, read-only afterwards.
#[derive(Default, Clone)]
pub struct MiddlewareRegistry {
    entries: HashMap<String, Arc<dyn Middleware>>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `middleware` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, middleware: impl Middleware + 'static) {
        let name = name.into();
        if self.entries.insert(name.clone(), Arc::new(middleware)).is_some() {
            tracing::warn!(middleware = %name, "Middleware re-registered, previous entry replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Middleware>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
