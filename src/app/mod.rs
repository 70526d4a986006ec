//! Movie catalog and watchlist application.
//!
//! # Data Flow
//! ```text
//! AppConfig
//!     → AppServices (accounts, catalog, watchlists)
//!     → controllers (Controller@action → handler closures)
//!     → bootstrap (auth middleware + handlers + configured routes)
//!     → Dispatcher
//! ```
//!
//! # Design Decisions
//! - Controllers receive services explicitly; there are no global singletons
//! - Data stores sit behind traits; the bundled implementations are in-memory
//! - Pages are plain HTML built in views.rs

pub mod accounts;
pub mod catalog;
pub mod controllers;
pub mod views;
pub mod watchlists;

use std::sync::Arc;

use axum::http::Method;

use crate::config::{AppConfig, AppSettings};
use crate::dispatch::Dispatcher;
use crate::middleware::AuthMiddleware;
use crate::routing::RouteError;

use self::accounts::{Accounts, MemoryAccounts};
use self::catalog::{MemoryCatalog, MovieCatalog};
use self::watchlists::WatchlistStore;

/// Collaborators shared by all controllers.
pub struct AppServices {
    pub settings: AppSettings,
    pub accounts: Arc<dyn Accounts>,
    pub catalog: Arc<dyn MovieCatalog>,
    pub watchlists: WatchlistStore,
}

impl AppServices {
    pub fn new(settings: AppSettings, accounts: Arc<dyn Accounts>, catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            settings,
            accounts,
            catalog,
            watchlists: WatchlistStore::new(),
        }
    }

    /// In-memory services seeded from config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.app.clone(),
            Arc::new(MemoryAccounts::new()),
            Arc::new(MemoryCatalog::new(config.catalog.movies.clone())),
        )
    }
}

/// Register middleware, controllers and the configured route table.
pub fn bootstrap(config: &AppConfig, services: Arc<AppServices>) -> Result<Dispatcher, RouteError> {
    let mut builder = Dispatcher::builder()
        .middleware("auth", AuthMiddleware::default())
        .handlers(controllers::registry(&services));

    for route in &config.routes {
        let method = Method::from_bytes(route.method.as_bytes())
            .map_err(|_| RouteError::InvalidMethod(route.method.clone()))?;
        builder = builder.route_owned(method, &route.path, route.handler.parse()?, route.middleware.clone())?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    #[test]
    fn test_default_table_boots_and_resolves_every_handler() {
        let config = AppConfig::default();
        let services = Arc::new(AppServices::from_config(&config));
        let registry = controllers::registry(&services);
        let dispatcher = bootstrap(&config, services).unwrap();

        assert_eq!(dispatcher.routes().len(), config.routes.len());
        for route in dispatcher.routes() {
            assert!(registry.resolve(route.handler()).is_some(), "{}", route.handler());
        }
    }

    #[test]
    fn test_unknown_middleware_in_config_rejected() {
        let mut config = AppConfig::default();
        config.routes = vec![RouteConfig::new("GET", "/admin", "HomeController@index", &["admin"])];
        let services = Arc::new(AppServices::from_config(&config));

        assert!(matches!(
            bootstrap(&config, services),
            Err(RouteError::UnknownMiddleware { .. })
        ));
    }
}
