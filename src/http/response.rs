//! Response handling and transformation.
//!
//! # Responsibilities
//! - Represent responses produced by middleware and handlers
//! - Provide the canonical not-found and error pages
//! - Convert into an axum response at the transport edge
//!
//! # Design Decisions
//! - Bodies are fully buffered strings; pages are small
//! - The not-found page is fixed and carries nothing route-specific
//! - Error details are only rendered in debug mode

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "404 - Page Not Found";

#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Response {
    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, "text/html; charset=utf-8", body)
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(StatusCode::OK, "application/json", value.to_string())
    }

    /// `302 Found` to `location`.
    pub fn redirect(location: &str) -> Self {
        let mut response = Self::new(StatusCode::FOUND, "text/html; charset=utf-8", String::new());
        match HeaderValue::from_str(location) {
            Ok(value) => {
                response.headers.insert(header::LOCATION, value);
            }
            Err(_) => {
                tracing::warn!(location, "Invalid redirect target, falling back to /");
                response.headers.insert(header::LOCATION, HeaderValue::from_static("/"));
            }
        }
        response
    }

    /// The canonical 404 page.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "text/html; charset=utf-8", NOT_FOUND_BODY)
    }

    /// 500 page. `message` is only shown when `debug` is set.
    pub fn server_error(debug: bool, message: &str) -> Self {
        let body = if debug {
            format!(
                "<h1>Application Error</h1>\n<p>{}</p>",
                crate::app::views::escape(message)
            )
        } else {
            "<h1>500 - Internal Server Error</h1>\n<p>An error occurred. Please try again later.</p>"
                .to_string()
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "text/html; charset=utf-8", body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
