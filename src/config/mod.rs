//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → AppConfig (validated, immutable)
//!     → routes handed to the RouterBuilder, the rest to the HTTP server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is fixed for the process lifetime
//! - All fields have defaults, including the application's route table
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, AppSettings, CatalogConfig, ListenerConfig, MovieConfig, ObservabilityConfig,
    RouteConfig, SecurityConfig, SessionConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
