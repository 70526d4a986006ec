//! Per-user watchlists.

use dashmap::DashMap;

/// Movie ids saved by each user, in the order they were added.
#[derive(Debug, Default)]
pub struct WatchlistStore {
    lists: DashMap<String, Vec<u64>>,
}

impl WatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn movies(&self, user: &str) -> Vec<u64> {
        self.lists.get(user).map(|l| l.value().clone()).unwrap_or_default()
    }

    pub fn contains(&self, user: &str, movie_id: u64) -> bool {
        self.lists
            .get(user)
            .map(|l| l.contains(&movie_id))
            .unwrap_or(false)
    }

    /// Returns false if the movie was already on the list.
    pub fn add(&self, user: &str, movie_id: u64) -> bool {
        let mut list = self.lists.entry(user.to_string()).or_default();
        if list.contains(&movie_id) {
            return false;
        }
        list.push(movie_id);
        true
    }

    /// Returns false if the movie was not on the list.
    pub fn remove(&self, user: &str, movie_id: u64) -> bool {
        match self.lists.get_mut(user) {
            Some(mut list) => {
                let before = list.len();
                list.retain(|id| *id != movie_id);
                list.len() != before
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let store = WatchlistStore::new();
        assert!(store.add("ana", 1));
        assert!(store.add("ana", 2));
        assert!(!store.add("ana", 1));
        assert_eq!(store.movies("ana"), [1, 2]);
        assert!(store.contains("ana", 2));

        assert!(store.remove("ana", 1));
        assert!(!store.remove("ana", 1));
        assert!(!store.remove("bob", 1));
        assert_eq!(store.movies("ana"), [2]);
        assert!(store.movies("bob").is_empty());
    }
}
