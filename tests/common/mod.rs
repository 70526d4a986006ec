//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request as HttpRequest, StatusCode};
use axum::Router;
use tower::ServiceExt;

use marquee::config::{AppConfig, MovieConfig};
use marquee::dispatch::{Handler, HandlerError};
use marquee::http::{Request, Response};
use marquee::lifecycle::startup::build_server;
use marquee::Outcome;

/// Handler that answers `label:param1,param2` and counts its calls.
#[derive(Clone, Default)]
pub struct Echo {
    pub label: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl Echo {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Handler for Echo {
    fn call(&self, _req: &mut Request, params: &[String]) -> Result<Response, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Response::html(format!("{}:{}", self.label, params.join(","))))
    }
}

/// Body of a handled outcome, or `None` for NotFound.
pub fn handled_body(outcome: Outcome) -> Option<String> {
    match outcome {
        Outcome::Handled(res) => Some(res.body().to_string()),
        Outcome::NotFound => None,
    }
}

pub fn movie(id: u64, title: &str, rating: f32, release_year: u16) -> MovieConfig {
    MovieConfig {
        id,
        title: title.to_string(),
        rating,
        release_year,
        plot: String::new(),
        length_minutes: 120,
        genres: vec!["Drama".to_string()],
    }
}

/// Default route table with a small seeded catalog.
pub fn sample_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.catalog.movies = vec![
        movie(1, "The Matrix", 8.7, 1999),
        movie(2, "Heat", 8.3, 1995),
        movie(3, "Cats", 2.8, 2019),
    ];
    config
}

/// The fully layered application router.
pub fn app(config: AppConfig) -> Router {
    build_server(config).expect("default route table builds").router()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    /// `name=value` of the session cookie set by this response.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("marquee_session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    /// Hidden CSRF token rendered in a form.
    pub fn csrf_token(&self) -> Option<String> {
        let marker = "name=\"csrf_token\" value=\"";
        let start = self.body.find(marker)? + marker.len();
        let end = self.body[start..].find('"')?;
        Some(self.body[start..start + end].to_string())
    }
}

pub async fn send(app: &Router, req: HttpRequest<Body>) -> TestResponse {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> HttpRequest<Body> {
    let mut builder = HttpRequest::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> HttpRequest<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let mut builder = HttpRequest::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Register and log in `email`, returning the authenticated session cookie.
pub async fn logged_in(app: &Router, email: &str) -> String {
    let page = send(app, get("/register", None)).await;
    let cookie = page.session_cookie().unwrap();
    let token = page.csrf_token().unwrap();

    let res = send(
        app,
        post_form(
            "/register",
            &[
                ("csrf_token", token.as_str()),
                ("first_name", "Ana"),
                ("last_name", "Lima"),
                ("email", email),
                ("password", "secret1"),
                ("confirm_password", "secret1"),
            ],
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.location(), Some("/login"));

    let res = send(
        app,
        post_form(
            "/login",
            &[("csrf_token", token.as_str()), ("email", email), ("password", "secret1")],
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.location(), Some("/home"));
    res.session_cookie().expect("login regenerates the session")
}
