//! Marquee: routing, dispatch and the movie catalog application built on it.

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod http;
pub mod middleware;
pub mod routing;
pub mod session;

// Application
pub mod app;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::AppConfig;
pub use dispatch::{Dispatcher, Outcome, RouterBuilder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
