//! Request handling and transformation.
//!
//! # Responsibilities
//! - Carry method, URI, query and form data to middleware and handlers
//! - Own the request's `Session` explicitly
//! - Parse `application/x-www-form-urlencoded` bodies
//!
//! # Design Decisions
//! - Method is kept as the raw verb string; matching compares it exactly
//! - Query and form maps keep the last value of repeated keys
//! - Transport details (sockets, body streaming) stay in server.rs

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::session::Session;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A request as seen by the dispatcher, middleware and handlers.
#[derive(Debug, Clone, Default)]
pub struct Request {
    method: String,
    uri: String,
    query: HashMap<String, String>,
    form: HashMap<String, String>,
    headers: HeaderMap,
    session: Session,
    matched_route: Option<String>,
}

impl Request {
    /// Build a request from a verb and a raw request URI (query string allowed).
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let query = query_string(&uri).map(parse_urlencoded).unwrap_or_default();
        Self {
            method: method.into(),
            uri,
            query,
            ..Self::default()
        }
    }

    /// Attach a urlencoded body.
    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.form = parse_urlencoded_bytes(body);
        self
    }

    /// Attach form fields directly.
    pub fn with_form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form = fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The raw request URI, including any query string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_post(&self) -> bool {
        self.method == "POST"
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn form(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }

    /// Form field, trimmed, or empty string when absent.
    pub fn form_or_empty(&self, key: &str) -> String {
        self.form(key).map(str::trim).unwrap_or_default().to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn request_id(&self) -> &str {
        self.header(X_REQUEST_ID).unwrap_or("unknown")
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Pattern of the route the dispatcher matched, if any.
    pub fn matched_route(&self) -> Option<&str> {
        self.matched_route.as_deref()
    }

    pub(crate) fn set_matched_route(&mut self, pattern: &str) {
        self.matched_route = Some(pattern.to_string());
    }

    /// Hand the session back to the transport for persistence.
    pub fn into_session(self) -> Session {
        self.session
    }
}

fn query_string(uri: &str) -> Option<&str> {
    let without_fragment = uri.split('#').next().unwrap_or(uri);
    without_fragment.split_once('?').map(|(_, q)| q)
}

fn parse_urlencoded(input: &str) -> HashMap<String, String> {
    parse_urlencoded_bytes(input.as_bytes())
}

fn parse_urlencoded_bytes(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parsed_from_uri() {
        let req = Request::new("GET", "/movies/search?q=the+matrix&page=2#top");
        assert_eq!(req.query("q"), Some("the matrix"));
        assert_eq!(req.query("page"), Some("2"));
        assert_eq!(req.uri(), "/movies/search?q=the+matrix&page=2#top");
    }

    #[test]
    fn test_form_body_parsed() {
        let req = Request::new("POST", "/login").with_body(b"email=ana%40example.com&password=secret");
        assert!(req.is_post());
        assert_eq!(req.form("email"), Some("ana@example.com"));
        assert_eq!(req.form_or_empty("missing"), "");
    }

    #[test]
    fn test_request_id_defaults_to_unknown() {
        let mut req = Request::new("GET", "/");
        assert_eq!(req.request_id(), "unknown");
        req.insert_header(HeaderName::from_static(X_REQUEST_ID), HeaderValue::from_static("abc"));
        assert_eq!(req.request_id(), "abc");
    }
}
