//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check route entries are well-formed before the router sees them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Pattern syntax and middleware names are checked by the RouterBuilder

use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::HandlerRef;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid socket address `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("security.max_body_size must be greater than 0")]
    ZeroBodyLimit,

    #[error("session.{0} must be greater than 0")]
    ZeroSessionTimer(&'static str),

    #[error("routes[{index}]: invalid method `{method}`")]
    InvalidMethod { index: usize, method: String },

    #[error("routes[{index}]: path `{path}` must start with `/`")]
    InvalidPath { index: usize, path: String },

    #[error("routes[{index}]: invalid handler `{handler}` (expected `Controller@action`)")]
    InvalidHandler { index: usize, handler: String },

    #[error("catalog: duplicate movie id {0}")]
    DuplicateMovie(u64),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.session.idle_timeout_secs == 0 {
        errors.push(ValidationError::ZeroSessionTimer("idle_timeout_secs"));
    }
    if config.session.sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroSessionTimer("sweep_interval_secs"));
    }

    for (index, route) in config.routes.iter().enumerate() {
        if Method::from_bytes(route.method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod {
                index,
                method: route.method.clone(),
            });
        }
        if !route.path.starts_with('/') {
            errors.push(ValidationError::InvalidPath {
                index,
                path: route.path.clone(),
            });
        }
        if route.handler.parse::<HandlerRef>().is_err() {
            errors.push(ValidationError::InvalidHandler {
                index,
                handler: route.handler.clone(),
            });
        }
    }

    let mut seen = std::collections::HashSet::new();
    for movie in &config.catalog.movies {
        if !seen.insert(movie.id) {
            errors.push(ValidationError::DuplicateMovie(movie.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
