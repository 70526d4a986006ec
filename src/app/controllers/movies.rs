use std::sync::Arc;

use crate::app::catalog::{Movie, LISTING_LIMIT};
use crate::app::controllers::page;
use crate::app::views::{escape, slug};
use crate::app::AppServices;
use crate::dispatch::{action, HandlerRegistry};
use crate::http::{Request, Response};

/// Render a list of movie cards linking to their detail pages.
pub fn movie_list(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "<p class=\"empty\">No movies found.</p>\n".to_string();
    }
    let mut out = String::from("<ul class=\"movies\">\n");
    for movie in movies {
        out.push_str(&format!(
            "<li data-movie-id=\"{}\"><a href=\"/movies/{}\">{}</a> ({}) &#9733; {:.1}</li>\n",
            movie.id,
            slug(&movie.title),
            escape(&movie.title),
            movie.release_year,
            movie.rating
        ));
    }
    out.push_str("</ul>\n");
    out
}

fn listing(services: &AppServices, req: &mut Request, heading: &str, movies: &[Movie]) -> Response {
    let content = format!("<h1>{}</h1>\n{}", escape(heading), movie_list(movies));
    page(services, req, heading, &content)
}

/// Detail page body. `in_watchlist` is `None` for anonymous visitors.
fn details(services: &AppServices, movie: &Movie, in_watchlist: Option<bool>) -> String {
    let mut content = format!(
        "<h1>{}</h1>\n<p>{} &middot; {} min &middot; &#9733; {:.1}</p>\n",
        escape(&movie.title),
        movie.release_year,
        movie.length_minutes,
        movie.rating
    );
    if !movie.genres.is_empty() {
        let genres: Vec<String> = movie.genres.iter().map(|g| escape(g)).collect();
        content.push_str(&format!("<p class=\"genres\">{}</p>\n", genres.join(", ")));
    }
    if !movie.plot.is_empty() {
        content.push_str(&format!("<p class=\"plot\">{}</p>\n", escape(&movie.plot)));
    }
    match in_watchlist {
        Some(true) => content.push_str(&format!(
            "<p class=\"watchlist-state\">In your watchlist</p>\n<button class=\"watchlist-remove\" data-movie-id=\"{}\">Remove from watchlist</button>\n",
            movie.id
        )),
        Some(false) => content.push_str(&format!(
            "<button class=\"watchlist-add\" data-movie-id=\"{}\">Add to {} watchlist</button>\n",
            movie.id,
            escape(&services.settings.name)
        )),
        None => {}
    }
    content
}

pub fn register(registry: &mut HandlerRegistry, services: &Arc<AppServices>) {
    let svc = services.clone();
    registry.register_action(
        "MovieController",
        "trending",
        action(0, move |req, _| {
            let movies = svc.catalog.trending(LISTING_LIMIT);
            Ok(listing(&svc, req, "Trending Movies", &movies))
        }),
    );

    let svc = services.clone();
    registry.register_action(
        "MovieController",
        "upcoming",
        action(0, move |req, _| {
            let movies = svc.catalog.upcoming(LISTING_LIMIT);
            Ok(listing(&svc, req, "Upcoming Movies", &movies))
        }),
    );

    let svc = services.clone();
    registry.register_action(
        "MovieController",
        "topRated",
        action(0, move |req, _| {
            let movies = svc.catalog.top_rated(LISTING_LIMIT);
            Ok(listing(&svc, req, "Top Rated Movies", &movies))
        }),
    );

    let svc = services.clone();
    registry.register_action(
        "MovieController",
        "search",
        action(0, move |req, _| {
            let query = req.query("q").map(str::trim).unwrap_or_default().to_string();
            if query.is_empty() {
                return Ok(Response::redirect("/"));
            }
            let movies = svc.catalog.search(&query);
            Ok(listing(&svc, req, &format!("Search results for \"{}\"", query), &movies))
        }),
    );

    let svc = services.clone();
    registry.register_action(
        "MovieController",
        "details",
        action(1, move |req, params| {
            let Some(movie) = svc.catalog.find_by_slug(&params[0]) else {
                return Ok(Response::not_found());
            };
            let in_watchlist = req
                .session()
                .user()
                .map(|user| svc.watchlists.contains(user, movie.id));
            let content = details(&svc, &movie, in_watchlist);
            Ok(page(&svc, req, &movie.title, &content))
        }),
    );
}
