//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router around the dispatcher
//! - Wire up layers (tracing, limits, timeouts, request ID)
//! - Load and persist the session around each dispatch
//! - Map dispatch failures to the 500 page
//! - Record request metrics
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SessionConfig};
use crate::dispatch::Dispatcher;
use crate::http::{Request, Response};
use crate::observability::metrics;
use crate::session::{CookieAction, SessionStore};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub sessions: Arc<SessionStore>,
    pub session_config: SessionConfig,
    pub debug: bool,
    pub max_body_size: usize,
}

/// HTTP server for the catalog application.
pub struct HttpServer {
    router: Router,
    sessions: Arc<SessionStore>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, dispatcher: Dispatcher, sessions: Arc<SessionStore>) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            sessions: sessions.clone(),
            session_config: config.session.clone(),
            debug: config.app.debug,
            max_body_size: config.security.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, sessions }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A clone of the fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The session store shared with every request.
    pub fn sessions(&self) -> Arc<SessionStore> {
        self.sessions.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: every request goes through the dispatcher.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: axum::extract::Request,
) -> AxumResponse {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method.as_str().to_string();
    let uri = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, uri = %uri, "Request body rejected");
            metrics::record_request(&method, 413, "none", start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let cookie_id = session_cookie(&parts.headers, &state.session_config.cookie_name);
    let session = state.sessions.load(cookie_id.as_deref());

    let mut req = Request::new(method.clone(), uri.clone())
        .with_headers(parts.headers.clone())
        .with_session(session);
    if is_form(&parts.headers) {
        req = req.with_body(&body);
    }

    let mut response = match state.dispatcher.dispatch(&mut req) {
        Ok(outcome) => outcome.into_response(),
        Err(e) => {
            tracing::error!(request_id = %req.request_id(), error = %e, "Dispatch failed");
            Response::server_error(state.debug, &e.to_string())
        }
    };

    let route = req.matched_route().unwrap_or("none").to_string();
    let action = state.sessions.save(req.into_session());
    if let Some(cookie) = set_cookie(&state.session_config, &action) {
        response.append_header(header::SET_COOKIE, cookie);
    }

    metrics::record_request(&method, response.status().as_u16(), &route, start_time);
    response.into_response()
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Session id from the request's `Cookie` headers.
fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value for the session, if the cookie must change.
fn set_cookie(config: &SessionConfig, action: &CookieAction) -> Option<HeaderValue> {
    let secure = if config.secure_cookie { "; Secure" } else { "" };
    let value = match action {
        CookieAction::Keep => return None,
        CookieAction::Set(id) => format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax{}",
            config.cookie_name, id, secure
        ),
        CookieAction::Clear => format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax{}",
            config.cookie_name, secure
        ),
    };
    HeaderValue::from_str(&value).ok()
}
