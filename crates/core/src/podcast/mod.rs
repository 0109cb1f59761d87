//! Podcast records and normalization of upstream search results.

mod types;

pub use types::*;

use serde_json::Value;

/// Why an upstream item was left out of the stored batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NotPodcast,
    MissingTrackId,
    Malformed,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::NotPodcast => "not_podcast",
            DropReason::MissingTrackId => "missing_track_id",
            DropReason::Malformed => "malformed",
        }
    }
}

/// Per-reason counts of dropped upstream items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DroppedCounts {
    pub not_podcast: usize,
    pub missing_track_id: usize,
    pub malformed: usize,
}

impl DroppedCounts {
    pub fn total(&self) -> usize {
        self.not_podcast + self.missing_track_id + self.malformed
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::NotPodcast => self.not_podcast += 1,
            DropReason::MissingTrackId => self.missing_track_id += 1,
            DropReason::Malformed => self.malformed += 1,
        }
    }

    /// Non-zero counts, for metrics.
    pub fn iter(&self) -> impl Iterator<Item = (DropReason, usize)> {
        [
            (DropReason::NotPodcast, self.not_podcast),
            (DropReason::MissingTrackId, self.missing_track_id),
            (DropReason::Malformed, self.malformed),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
    }
}

/// Result of normalizing an upstream `results` array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Records ready to upsert, in upstream order.
    pub records: Vec<PodcastRecord>,
    pub dropped: DroppedCounts,
}

/// Filter upstream items to podcasts with a track id and map them to records.
pub fn normalize_results(results: Vec<Value>) -> Normalized {
    let mut normalized = Normalized::default();

    for raw in results {
        let item: SearchItem = match serde_json::from_value(raw) {
            Ok(item) => item,
            Err(_) => {
                normalized.dropped.record(DropReason::Malformed);
                continue;
            }
        };

        if !item.is_podcast() {
            normalized.dropped.record(DropReason::NotPodcast);
            continue;
        }

        match item.into_record() {
            Some(record) => normalized.records.push(record),
            None => normalized.dropped.record(DropReason::MissingTrackId),
        }
    }

    normalized
}
