//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the application.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Application settings (name, debug mode).
    pub app: AppSettings,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route table, in match order.
    pub routes: Vec<RouteConfig>,

    /// Seed data for the in-memory movie catalog.
    pub catalog: CatalogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            app: AppSettings::default(),
            session: SessionConfig::default(),
            timeouts: TimeoutConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
            routes: default_routes(),
            catalog: CatalogConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Application-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppSettings {
    /// Site name shown in page titles.
    pub name: String,

    /// Render error details on 500 pages.
    pub debug: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "CineKTic".to_string(),
            debug: false,
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie name carrying the session id.
    pub cookie_name: String,

    /// Add the `Secure` attribute (HTTPS deployments).
    pub secure_cookie: bool,

    /// Drop sessions not seen for this many seconds.
    pub idle_timeout_secs: u64,

    /// How often idle sessions are swept, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "marquee_session".to_string(),
            secure_cookie: false,
            idle_timeout_secs: 1440,
            sweep_interval_secs: 60,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024, // form posts only
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable logs.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A route entry. Order in the config file is match order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// HTTP method, matched exactly (e.g. "GET").
    pub method: String,

    /// Path pattern, e.g. "/movies/{title}".
    pub path: String,

    /// Handler reference, "Controller@action".
    pub handler: String,

    /// Middleware names run before the handler, in order.
    #[serde(default)]
    pub middleware: Vec<String>,
}

impl RouteConfig {
    pub fn new(method: &str, path: &str, handler: &str, middleware: &[&str]) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            handler: handler.to_string(),
            middleware: middleware.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// The application's route table.
///
/// Literal `/movies/...` routes precede `/movies/{title}`, which would otherwise shadow them.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        // Public
        RouteConfig::new("GET", "/", "HomeController@index", &[]),
        RouteConfig::new("GET", "/login", "AuthController@showLogin", &[]),
        RouteConfig::new("POST", "/login", "AuthController@login", &[]),
        RouteConfig::new("GET", "/register", "AuthController@showRegister", &[]),
        RouteConfig::new("POST", "/register", "AuthController@register", &[]),
        RouteConfig::new("GET", "/password-recovery", "AuthController@showPasswordRecovery", &[]),
        RouteConfig::new("POST", "/password-recovery", "AuthController@recoverPassword", &[]),
        RouteConfig::new("GET", "/movies/trending", "MovieController@trending", &[]),
        RouteConfig::new("GET", "/movies/upcoming", "MovieController@upcoming", &[]),
        RouteConfig::new("GET", "/movies/top-rated", "MovieController@topRated", &[]),
        RouteConfig::new("GET", "/movies/search", "MovieController@search", &[]),
        RouteConfig::new("GET", "/movies/{title}", "MovieController@details", &[]),
        // Authenticated
        RouteConfig::new("GET", "/logout", "AuthController@logout", &["auth"]),
        RouteConfig::new("GET", "/home", "HomeController@loggedIn", &["auth"]),
        RouteConfig::new("GET", "/watchlist", "WatchlistController@index", &["auth"]),
        RouteConfig::new("POST", "/watchlist/add", "WatchlistController@add", &["auth"]),
        RouteConfig::new("POST", "/watchlist/remove", "WatchlistController@remove", &["auth"]),
    ]
}

/// In-memory catalog seed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub movies: Vec<MovieConfig>,
}

/// One catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MovieConfig {
    pub id: u64,
    pub title: String,
    /// Rating out of 10.
    #[serde(default)]
    pub rating: f32,
    pub release_year: u16,
    #[serde(default)]
    pub plot: String,
    /// Runtime in minutes.
    #[serde(default)]
    pub length_minutes: u16,
    #[serde(default)]
    pub genres: Vec<String>,
}
