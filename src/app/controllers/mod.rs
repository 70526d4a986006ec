//! Controllers: the handlers behind `Controller@action` references.

pub mod auth;
pub mod home;
pub mod movies;
pub mod watchlist;

use std::sync::Arc;

use crate::app::views::{layout, Flashes};
use crate::app::AppServices;
use crate::dispatch::HandlerRegistry;
use crate::http::{Request, Response};

/// Build the handler registry for every controller.
pub fn registry(services: &Arc<AppServices>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    home::register(&mut registry, services);
    auth::register(&mut registry, services);
    movies::register(&mut registry, services);
    watchlist::register(&mut registry, services);
    registry
}

/// Render `content` in the site layout, consuming pending flash messages.
pub(crate) fn page(services: &AppServices, req: &mut Request, title: &str, content: &str) -> Response {
    let session = req.session_mut();
    let flashes = Flashes {
        success: session.take_flash("success"),
        error: session.take_flash("error"),
    };
    let authenticated = session.is_authenticated();
    Response::html(layout(&services.settings.name, title, authenticated, &flashes, content))
}
