//! SQLite-backed podcast store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{PodcastStore, StoreError};
use crate::podcast::PodcastRecord;

const COLUMNS: &str = r#""trackId", "artistName", "collectionName", "trackName", "feedUrl",
    "artworkUrl100", "artworkUrl600", "releaseDate", created_at"#;

/// SQLite-backed podcast store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS podcasts (
                "trackId" INTEGER PRIMARY KEY,
                "artistName" TEXT,
                "collectionName" TEXT,
                "trackName" TEXT,
                "feedUrl" TEXT,
                "artworkUrl100" TEXT,
                "artworkUrl600" TEXT,
                "releaseDate" TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    /// Get a stored podcast by track id.
    pub fn get(&self, track_id: i64) -> Result<Option<PodcastRecord>, StoreError> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                &format!(r#"SELECT {} FROM podcasts WHERE "trackId" = ?"#, COLUMNS),
                params![track_id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Number of stored podcasts.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM podcasts", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn upsert_batch(&self, records: &[PodcastRecord]) -> Result<Vec<PodcastRecord>, StoreError> {
        let mut conn = self.lock()?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        // One transaction per batch: either every row lands or none does.
        let tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(&format!(
                r#"INSERT INTO podcasts ({})
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                   ON CONFLICT("trackId") DO UPDATE SET
                       "artistName" = excluded."artistName",
                       "collectionName" = excluded."collectionName",
                       "trackName" = excluded."trackName",
                       "feedUrl" = excluded."feedUrl",
                       "artworkUrl100" = excluded."artworkUrl100",
                       "artworkUrl600" = excluded."artworkUrl600",
                       "releaseDate" = excluded."releaseDate"
                   RETURNING {}"#,
                COLUMNS, COLUMNS
            ))?;

            for record in records {
                let row = stmt.query_row(
                    params![
                        record.track_id,
                        record.artist_name,
                        record.collection_name,
                        record.track_name,
                        record.feed_url,
                        record.artwork_url_100,
                        record.artwork_url_600,
                        record.release_date,
                        now,
                    ],
                    Self::row_to_record,
                )?;
                stored.push(row);
            }
        }
        tx.commit()?;

        Ok(stored)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<PodcastRecord> {
        Ok(PodcastRecord {
            track_id: row.get(0)?,
            artist_name: row.get(1)?,
            collection_name: row.get(2)?,
            track_name: row.get(3)?,
            feed_url: row.get(4)?,
            artwork_url_100: row.get(5)?,
            artwork_url_600: row.get(6)?,
            release_date: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

#[async_trait]
impl PodcastStore for SqliteStore {
    async fn upsert(&self, records: &[PodcastRecord]) -> Result<Vec<PodcastRecord>, StoreError> {
        self.upsert_batch(records)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
