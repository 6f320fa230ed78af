#![forbid(unsafe_code)]

mod capture;
mod error;
mod records;
mod requests;
mod sweep;

pub use error::StoreError;
pub use requests::*;

use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "tabbundlr.db";
const SCHEMA_VERSION: i64 = 1;

/// The archive's record store: one `pages` row per canonical locator, plus
/// the two derived orderings (by recency, by partition then recency) the
/// sweep and the display layer walk.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    /// Opens (or creates) the store. All-or-nothing: a database that holds
    /// foreign tables or a mismatched schema version is rejected rather
    /// than migrated.
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = ["store_state", "pages"].into_iter().collect();

    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    for table in required {
        if !tables.contains(table) {
            return Err(StoreError::InvalidInput(
                "RESET_REQUIRED: required table is missing",
            ));
        }
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(found) if found == SCHEMA_VERSION => Ok(()),
        found => Err(StoreError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pages (
          url TEXT PRIMARY KEY,
          domain TEXT NOT NULL,
          title TEXT NOT NULL DEFAULT '',
          icon TEXT NOT NULL DEFAULT '',
          seen_count INTEGER NOT NULL CHECK(seen_count >= 1),
          last_seen_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pages_last_seen
          ON pages(last_seen_ms);

        CREATE INDEX IF NOT EXISTS idx_pages_domain_seen
          ON pages(domain, last_seen_ms DESC);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO store_state(singleton, schema_version, created_at_ms) \
         VALUES (1, ?1, ?2)",
        params![SCHEMA_VERSION, now_ms()],
    )?;

    Ok(())
}

fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}
