use std::sync::Arc;

use serde_json::json;

use crate::app::controllers::{movies::movie_list, page};
use crate::app::AppServices;
use crate::dispatch::{action, HandlerRegistry};
use crate::http::{Request, Response};

fn reply(success: bool, message: &str) -> Response {
    Response::json(&json!({ "success": success, "message": message }))
}

/// Common checks for the add/remove endpoints: method, user, movie id.
fn parse_change(req: &Request) -> Result<(String, u64), Response> {
    if !req.is_post() {
        return Err(reply(false, "Invalid request method"));
    }
    let Some(user) = req.session().user() else {
        return Err(reply(false, "Please login first"));
    };
    match req.form("movie_id").and_then(|id| id.trim().parse::<u64>().ok()) {
        Some(id) if id > 0 => Ok((user.to_string(), id)),
        _ => Err(reply(false, "Invalid movie ID")),
    }
}

fn add(services: &AppServices, req: &Request) -> Response {
    let (user, movie_id) = match parse_change(req) {
        Ok(change) => change,
        Err(res) => return res,
    };
    if services.catalog.find_by_id(movie_id).is_none() {
        return reply(false, "Movie not found");
    }
    if !services.watchlists.add(&user, movie_id) {
        return reply(false, "Movie already in watchlist");
    }
    tracing::debug!(request_id = %req.request_id(), movie_id, "Movie added to watchlist");
    reply(true, "Movie added to watchlist successfully")
}

fn remove(services: &AppServices, req: &Request) -> Response {
    let (user, movie_id) = match parse_change(req) {
        Ok(change) => change,
        Err(res) => return res,
    };
    if !services.watchlists.remove(&user, movie_id) {
        return reply(false, "Failed to remove movie from watchlist");
    }
    tracing::debug!(request_id = %req.request_id(), movie_id, "Movie removed from watchlist");
    reply(true, "Movie removed from watchlist successfully")
}

pub fn register(registry: &mut HandlerRegistry, services: &Arc<AppServices>) {
    let svc = services.clone();
    registry.register_action(
        "WatchlistController",
        "index",
        action(0, move |req, _| {
            let Some(user) = req.session().user().map(str::to_string) else {
                return Ok(Response::redirect("/login"));
            };
            let movies: Vec<_> = svc
                .watchlists
                .movies(&user)
                .into_iter()
                .filter_map(|id| svc.catalog.find_by_id(id))
                .collect();
            let content = format!(
                "<h1>My Watchlist</h1>\n<p>{} movie(s)</p>\n{}",
                movies.len(),
                movie_list(&movies)
            );
            Ok(page(&svc, req, "My Watchlist", &content))
        }),
    );

    let svc = services.clone();
    registry.register_action(
        "WatchlistController",
        "add",
        action(0, move |req, _| Ok(add(&svc, req))),
    );

    let svc = services.clone();
    registry.register_action(
        "WatchlistController",
        "remove",
        action(0, move |req, _| Ok(remove(&svc, req))),
    );
}
