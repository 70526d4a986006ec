//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers: request id, trace, timeout, body limit)
//!     → request.rs (method, URI, query, form, headers, session)
//!     → dispatch (route match → middleware → handler)
//!     → response.rs (status, headers, body)
//!     → server.rs (session cookie, metrics)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Dispatch works on crate-owned `Request`/`Response` types, so it runs
//!   without a socket in tests
//! - Axum only sees a single fallback handler; all routing is ours

pub mod request;
pub mod response;
pub mod server;

pub use request::{Request, X_REQUEST_ID};
pub use response::{Response, NOT_FOUND_BODY};
pub use server::HttpServer;
