//! Movie catalog access.
//!
//! # Responsibilities
//! - Look up movies by id and by URL slug
//! - Produce the trending, upcoming, top-rated and search listings
//!
//! # Design Decisions
//! - `MovieCatalog` is the seam to the real data store
//! - `MemoryCatalog` is seeded from config and read-only at runtime
//! - Listings are capped at `LISTING_LIMIT` entries

use std::cmp::Ordering;

use crate::app::views::slug;
use crate::config::MovieConfig;

/// Maximum entries in a listing page.
pub const LISTING_LIMIT: usize = 20;

/// Minimum rating for the top-rated listing.
pub const TOP_RATED_THRESHOLD: f32 = 8.0;

pub type Movie = MovieConfig;

/// Read access to movies.
pub trait MovieCatalog: Send + Sync {
    fn find_by_id(&self, id: u64) -> Option<Movie>;
    fn find_by_slug(&self, slug: &str) -> Option<Movie>;
    /// Highest rated first.
    fn trending(&self, limit: usize) -> Vec<Movie>;
    /// Most recent release first.
    fn upcoming(&self, limit: usize) -> Vec<Movie>;
    /// Rated at least [`TOP_RATED_THRESHOLD`], highest first.
    fn top_rated(&self, limit: usize) -> Vec<Movie>;
    /// Case-insensitive title substring match, highest rated first.
    fn search(&self, query: &str) -> Vec<Movie>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    movies: Vec<Movie>,
}

impl MemoryCatalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    fn sorted_by<F>(&self, filter: impl Fn(&Movie) -> bool, cmp: F, limit: usize) -> Vec<Movie>
    where
        F: Fn(&Movie, &Movie) -> Ordering,
    {
        let mut movies: Vec<Movie> = self.movies.iter().filter(|m| filter(m)).cloned().collect();
        movies.sort_by(cmp);
        movies.truncate(limit);
        movies
    }
}

fn by_rating_desc(a: &Movie, b: &Movie) -> Ordering {
    b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
}

impl MovieCatalog for MemoryCatalog {
    fn find_by_id(&self, id: u64) -> Option<Movie> {
        self.movies.iter().find(|m| m.id == id).cloned()
    }

    fn find_by_slug(&self, wanted: &str) -> Option<Movie> {
        let wanted = wanted.to_ascii_lowercase();
        self.movies.iter().find(|m| slug(&m.title) == wanted).cloned()
    }

    fn trending(&self, limit: usize) -> Vec<Movie> {
        self.sorted_by(|_| true, by_rating_desc, limit)
    }

    fn upcoming(&self, limit: usize) -> Vec<Movie> {
        self.sorted_by(|_| true, |a, b| b.release_year.cmp(&a.release_year), limit)
    }

    fn top_rated(&self, limit: usize) -> Vec<Movie> {
        self.sorted_by(|m| m.rating >= TOP_RATED_THRESHOLD, by_rating_desc, limit)
    }

    fn search(&self, query: &str) -> Vec<Movie> {
        let query = query.to_lowercase();
        self.sorted_by(
            |m| m.title.to_lowercase().contains(&query),
            by_rating_desc,
            usize::MAX,
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_movies() -> Vec<Movie> {
    let movie = |id, title: &str, rating, release_year| Movie {
        id,
        title: title.to_string(),
        rating,
        release_year,
        plot: String::new(),
        length_minutes: 120,
        genres: vec![],
    };
    vec![
        movie(1, "The Matrix", 8.7, 1999),
        movie(2, "Heat", 8.3, 1995),
        movie(3, "Dune: Part Two", 8.5, 2024),
        movie(4, "Cats", 2.8, 2019),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn test_listings() {
        let catalog = MemoryCatalog::new(sample_movies());
        assert_eq!(titles(&catalog.trending(2)), ["The Matrix", "Dune: Part Two"]);
        assert_eq!(titles(&catalog.upcoming(1)), ["Dune: Part Two"]);
        assert_eq!(titles(&catalog.top_rated(10)), ["The Matrix", "Dune: Part Two", "Heat"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = MemoryCatalog::new(sample_movies());
        assert_eq!(titles(&catalog.search("MATRIX")), ["The Matrix"]);
        assert!(catalog.search("nothing").is_empty());
    }

    #[test]
    fn test_find_by_slug() {
        let catalog = MemoryCatalog::new(sample_movies());
        assert_eq!(catalog.find_by_slug("dune-part-two").map(|m| m.id), Some(3));
        assert_eq!(catalog.find_by_slug("The-Matrix").map(|m| m.id), Some(1));
        assert!(catalog.find_by_slug("unknown").is_none());
    }
}
