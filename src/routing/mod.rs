//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     (method, "/movies/{title}", "MovieController@details", ["auth"])
//!     → pattern.rs (compile placeholders into an anchored regex)
//!     → table.rs (append to the ordered route table)
//!     → Freeze inside the Dispatcher
//!
//! Incoming request (method, path):
//!     → table.rs (scan in registration order, method first)
//!     → pattern.rs (full match, extract placeholder values)
//!     → Return: matched Route + params, or no match
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at registration; a malformed placeholder never reaches a request
//! - Placeholders never span a `/`
//! - First match wins; registration order is the only precedence rule
//! - Duplicate routes are allowed, the earliest shadows the rest

pub mod error;
pub mod pattern;
pub mod table;

pub use error::RouteError;
pub use pattern::{compile, CompiledPattern};
pub use table::{HandlerRef, Route, RouteTable};
