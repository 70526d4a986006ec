//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! Matched route (middleware: ["auth", ...])
//!     → registry.rs (resolve each name, validated at startup)
//!     → chain.rs (run in listed order)
//!         - Flow::Continue → next middleware, then the handler
//!         - Flow::Halt(resp) → stop; resp is the final response
//! ```
//!
//! # Design Decisions
//! - Middleware are synchronous gates run before the handler
//! - No priorities: the order listed on the route is the order run
//! - A halting middleware owns the response (e.g. a login redirect)

pub mod auth;
pub mod chain;
pub mod registry;

pub use auth::AuthMiddleware;
pub use chain::{run_chain, Flow, Middleware};
pub use registry::MiddlewareRegistry;
