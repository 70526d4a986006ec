//! Configuration-time routing errors.

use thiserror::Error;

/// Errors raised while building the route table.
///
/// All of these surface before the server accepts traffic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// The path pattern contains a malformed placeholder.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The HTTP method is not a valid token.
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),

    /// A handler reference is not of the form `Controller@action`.
    #[error("invalid handler reference `{0}` (expected `Controller@action`)")]
    InvalidHandler(String),

    /// A route names middleware that was never registered.
    #[error("route `{method} {pattern}` references unknown middleware `{name}`")]
    UnknownMiddleware {
        method: String,
        pattern: String,
        name: String,
    },
}
