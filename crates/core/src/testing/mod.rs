//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the search API and the podcast store so the
//! search-and-store flow and the HTTP layer can be exercised without network
//! access or a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use podsearch_core::testing::{fixtures, MockPodcastSearch, MockPodcastStore};
//!
//! let search = Arc::new(MockPodcastSearch::new());
//! let store = Arc::new(MockPodcastStore::new());
//!
//! search.set_results(fixtures::search_results(&[(1, "Serial")])).await;
//!
//! let service = PodcastService::new(search.clone(), store.clone());
//! ```

mod mock_search;
mod mock_store;

pub use mock_search::MockPodcastSearch;
pub use mock_store::MockPodcastStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A raw search API item describing a podcast.
    pub fn podcast_item(track_id: i64, name: &str) -> Value {
        json!({
            "wrapperType": "track",
            "kind": "podcast",
            "trackId": track_id,
            "artistName": format!("{} Media", name),
            "collectionName": name,
            "trackName": name,
            "feedUrl": format!("https://feeds.example.com/{}.xml", track_id),
            "artworkUrl100": format!("https://img.example.com/{}/100x100.jpg", track_id),
            "artworkUrl600": format!("https://img.example.com/{}/600x600.jpg", track_id),
            "releaseDate": "2024-01-01T00:00:00Z",
            "primaryGenreName": "Society & Culture"
        })
    }

    /// A `results` array of podcast items.
    pub fn search_results(items: &[(i64, &str)]) -> Vec<Value> {
        items
            .iter()
            .map(|(track_id, name)| podcast_item(*track_id, name))
            .collect()
    }
}
