use std::sync::Arc;

use crate::app::controllers::{movies::movie_list, page};
use crate::app::views::escape;
use crate::app::AppServices;
use crate::dispatch::{action, HandlerRegistry};
use crate::http::Response;

/// Movies featured on the landing page.
const FEATURED: usize = 6;

pub fn register(registry: &mut HandlerRegistry, services: &Arc<AppServices>) {
    let svc = services.clone();
    registry.register_action(
        "HomeController",
        "index",
        action(0, move |req, _| {
            if req.session().is_authenticated() {
                return Ok(Response::redirect("/home"));
            }
            let featured = svc.catalog.trending(FEATURED);
            let content = format!(
                "<h1>Welcome to {}</h1>\n<p>Discover movies and build your watchlist.</p>\n{}",
                escape(&svc.settings.name),
                movie_list(&featured)
            );
            Ok(page(&svc, req, "Home", &content))
        }),
    );

    let svc = services.clone();
    registry.register_action(
        "HomeController",
        "loggedIn",
        action(0, move |req, _| {
            let user = req.session().user().unwrap_or_default().to_string();
            let saved = svc.watchlists.movies(&user).len();
            let featured = svc.catalog.trending(FEATURED);
            let content = format!(
                "<h1>Welcome back, {}</h1>\n<p>You have {} movie(s) in your <a href=\"/watchlist\">watchlist</a>.</p>\n{}",
                escape(&user),
                saved,
                movie_list(&featured)
            );
            Ok(page(&svc, req, "Home", &content))
        }),
    );
}
