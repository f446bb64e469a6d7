//! SQLite-backed sink.

use async_trait::async_trait;
use bookchain_core::{Block, BookchainError, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

use super::BlockSink;

/// Persistent sink backed by a SQLite database.
///
/// One row per block; the autoincrement `id` column preserves insertion
/// order, so listing by primary key yields acceptance order. Each append is
/// an independent single-statement transaction — the polling model runs one
/// cycle at a time, so no cross-call locking is needed.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(sink_err)?;
        let sink = Self::with_connection(conn)?;
        info!(path = %path.display(), "block database ready");
        Ok(sink)
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(sink_err)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS blocks (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                hash      TEXT,
                timestamp TEXT NOT NULL,
                text      TEXT NOT NULL
            );",
        )
        .map_err(sink_err)?;
        Ok(Self { conn })
    }
}

#[async_trait(?Send)]
impl BlockSink for SqliteSink {
    async fn append(&mut self, block: &Block) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO blocks (hash, timestamp, text) VALUES (?1, ?2, ?3)",
                params![block.hash, block.timestamp, block.text],
            )
            .map_err(sink_err)?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Block>> {
        let mut statement = self
            .conn
            .prepare("SELECT hash, timestamp, text FROM blocks ORDER BY id")
            .map_err(sink_err)?;
        let rows = statement
            .query_map([], |row| {
                Ok(Block {
                    hash: row.get(0)?,
                    timestamp: row.get(1)?,
                    text: row.get(2)?,
                })
            })
            .map_err(sink_err)?;

        rows.collect::<std::result::Result<Vec<_>, _>>().map_err(sink_err)
    }
}

fn sink_err(e: rusqlite::Error) -> BookchainError {
    BookchainError::Sink(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(hash: Option<&str>, text: &str) -> Block {
        Block {
            hash: hash.map(str::to_owned),
            timestamp: "1518031177".into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn round_trips_blocks_in_insertion_order() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        sink.append(&block(None, "genesis")).await.unwrap();
        sink.append(&block(Some("aaa"), "second")).await.unwrap();
        sink.append(&block(Some("bbb"), "third")).await.unwrap();

        let all = sink.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], block(None, "genesis"));
        assert_eq!(all[1], block(Some("aaa"), "second"));
        assert_eq!(all[2], block(Some("bbb"), "third"));
    }

    #[tokio::test]
    async fn absent_link_survives_storage_as_null() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        sink.append(&block(None, "genesis")).await.unwrap();
        let all = sink.list_all().await.unwrap();
        assert_eq!(all[0].hash, None);
        assert_eq!(all[0].link_or_sentinel(), "null");
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.db");

        {
            let mut sink = SqliteSink::open(&path).unwrap();
            sink.append(&block(None, "durable")).await.unwrap();
        }

        let sink = SqliteSink::open(&path).unwrap();
        let all = sink.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "durable");
    }
}
