//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request (method, raw URI)
//!     → dispatcher.rs normalize (drop query/fragment, one trailing '/')
//!     → routing::RouteTable (first match in registration order)
//!     → middleware::run_chain (may halt with its own response)
//!     → handler.rs (resolve Controller@action, check parameter count)
//!     → Outcome::Handled(response) | Outcome::NotFound
//! ```
//!
//! # Design Decisions
//! - Built once through `RouterBuilder`, immutable afterwards (shared via Arc)
//! - Synchronous: no suspension point between match and handler
//! - Unknown handlers and parameter mismatches look exactly like a routing miss

pub mod dispatcher;
pub mod handler;

pub use dispatcher::{normalize_path, DispatchContext, DispatchError, Dispatcher, Outcome, RouterBuilder};
pub use handler::{action, Handler, HandlerError, HandlerRegistry};
