//! SQLite output handler
//!
//! Stores each run and its records in a SQLite database. Several runs can
//! accumulate in the same file; each `persist` call adds one run inside a
//! single transaction.

use crate::output::record::{iso_timestamp, CrawlRun};
use crate::output::traits::{OutputResult, ResultSink};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the results database
pub const SCHEMA_SQL: &str = r#"
-- One row per crawl run
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sitemap_url TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    config_hash TEXT,
    total_urls INTEGER NOT NULL,
    succeeded INTEGER NOT NULL
);

-- One row per probed URL, in resolution order
CREATE TABLE IF NOT EXISTS crawl_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    position INTEGER NOT NULL,
    url TEXT NOT NULL,
    success INTEGER NOT NULL,
    desktop_status INTEGER,
    mobile_status INTEGER,
    failed_viewport TEXT,
    error_message TEXT,
    duration_seconds REAL NOT NULL,
    recorded_at TEXT NOT NULL,
    UNIQUE(run_id, position)
);

CREATE INDEX IF NOT EXISTS idx_crawl_records_run ON crawl_records(run_id);
CREATE INDEX IF NOT EXISTS idx_crawl_records_url ON crawl_records(url);
"#;

/// Result sink writing runs into SQLite
pub struct SqliteSink {
    conn: Connection,
    label: String,
    config_hash: Option<String>,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Hash of the config file the run was started with
    pub fn open(path: &Path, config_hash: Option<String>) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn,
            label: format!("sqlite:{}", path.display()),
            config_hash,
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn,
            label: "sqlite::memory:".to_string(),
            config_hash: None,
        })
    }

    /// Number of runs stored in the database
    pub fn count_runs(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// URLs of a run in stored order
    pub fn urls_for_run(&self, run_id: i64) -> OutputResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM crawl_records WHERE run_id = ?1 ORDER BY position")?;
        let urls = stmt
            .query_map(params![run_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }
}

impl ResultSink for SqliteSink {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn persist(&mut self, run: &CrawlRun) -> OutputResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (sitemap_url, started_at, finished_at, config_hash, total_urls, succeeded)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run.sitemap_url,
                iso_timestamp(run.started_at),
                iso_timestamp(run.finished_at),
                self.config_hash,
                run.len() as i64,
                run.succeeded() as i64,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO crawl_records
                 (run_id, position, url, success, desktop_status, mobile_status,
                  failed_viewport, error_message, duration_seconds, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for (position, record) in run.records.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    record.url,
                    record.success,
                    record.desktop_status,
                    record.mobile_status,
                    record.failed_viewport.map(|v| v.as_str()),
                    record.error_message,
                    record.duration_seconds,
                    record.timestamp,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Stored run {} ({} records) in {}", run_id, run.len(), self.label);
        Ok(())
    }
}
