//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie `marquee_session=<id>`
//!     → store.rs (load SessionData by id, or start empty)
//!     → state.rs (Session passed explicitly to middleware and handlers)
//!     → store.rs (save, rotate or drop; decide cookie action)
//!     → Set-Cookie on the response
//! ```
//!
//! # Design Decisions
//! - No ambient session: every consumer receives `&mut Session` through the request
//! - Storage is in-memory and process-local
//! - A session id is only issued once the session holds data
//! - Sessions idle past `session.idle_timeout_secs` are dropped, lazily on
//!   load and by the periodic `sweep_idle` task

pub mod state;
pub mod store;

pub use state::{Session, SessionData};
pub use store::{sweep_idle, CookieAction, SessionStore};
