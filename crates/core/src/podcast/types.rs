//! Podcast record and upstream search item types.

use serde::{Deserialize, Serialize};

/// Upstream `kind` value for podcast results.
pub const PODCAST_KIND: &str = "podcast";

/// A podcast as stored in (and returned from) the `podcasts` table.
///
/// Absent fields serialize as `null` so every row of a batch carries the
/// same columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodcastRecord {
    /// Unique track identifier; the upsert conflict key.
    #[serde(rename = "trackId")]
    pub track_id: i64,
    #[serde(rename = "artistName", default)]
    pub artist_name: Option<String>,
    #[serde(rename = "collectionName", default)]
    pub collection_name: Option<String>,
    #[serde(rename = "trackName", default)]
    pub track_name: Option<String>,
    #[serde(rename = "feedUrl", default)]
    pub feed_url: Option<String>,
    #[serde(rename = "artworkUrl100", default)]
    pub artwork_url_100: Option<String>,
    #[serde(rename = "artworkUrl600", default)]
    pub artwork_url_600: Option<String>,
    /// Release date as sent upstream; never parsed.
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<String>,
    /// Assigned by the store on first insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PodcastRecord {
    /// Create a record with only the track id set.
    pub fn new(track_id: i64) -> Self {
        Self {
            track_id,
            artist_name: None,
            collection_name: None,
            track_name: None,
            feed_url: None,
            artwork_url_100: None,
            artwork_url_600: None,
            release_date: None,
            created_at: None,
        }
    }
}

/// One item of the upstream `results` array.
///
/// Every field is optional; anything not listed here is discarded.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(rename = "trackId", default)]
    pub track_id: Option<i64>,
    #[serde(rename = "artistName", default)]
    pub artist_name: Option<String>,
    #[serde(rename = "collectionName", default)]
    pub collection_name: Option<String>,
    #[serde(rename = "trackName", default)]
    pub track_name: Option<String>,
    #[serde(rename = "feedUrl", default)]
    pub feed_url: Option<String>,
    #[serde(rename = "artworkUrl100", default)]
    pub artwork_url_100: Option<String>,
    #[serde(rename = "artworkUrl600", default)]
    pub artwork_url_600: Option<String>,
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<String>,
}

impl SearchItem {
    /// Whether the item is a podcast result.
    pub fn is_podcast(&self) -> bool {
        self.kind.as_deref() == Some(PODCAST_KIND)
    }

    /// Track id, treating 0 as absent.
    pub fn track_id(&self) -> Option<i64> {
        self.track_id.filter(|id| *id != 0)
    }

    /// Convert into a storable record, or `None` if the item is not a
    /// podcast or has no track id.
    pub fn into_record(self) -> Option<PodcastRecord> {
        if !self.is_podcast() {
            return None;
        }
        let track_id = self.track_id()?;

        Some(PodcastRecord {
            track_id,
            artist_name: self.artist_name,
            collection_name: self.collection_name,
            track_name: self.track_name,
            feed_url: self.feed_url,
            artwork_url_100: self.artwork_url_100,
            artwork_url_600: self.artwork_url_600,
            release_date: self.release_date,
            created_at: None,
        })
    }
}
