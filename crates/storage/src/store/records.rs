#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension, params};
use tb_core::Record;

impl SqliteStore {
    /// Snapshot of every record in default display order (newest first).
    /// One statement on one connection, so a concurrent capture batch is
    /// either fully visible or not at all.
    pub fn list_records(&self) -> Result<Vec<Record>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT url, domain, title, icon, seen_count, last_seen_ms \
             FROM pages ORDER BY last_seen_ms DESC, url ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(record_from_row(row)?);
        }
        Ok(records)
    }

    pub fn get_record(&self, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT url, domain, title, icon, seen_count, last_seen_ms \
                 FROM pages WHERE url=?1",
                params![id],
                record_from_row,
            )
            .optional()?)
    }

    /// Display-surface delete of a single record. False when absent.
    pub fn delete_record(&mut self, id: &str) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM pages WHERE url=?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Display-surface full clear. Returns the number of rows removed.
    pub fn clear_all(&mut self) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM pages", [])?;
        tx.commit()?;
        Ok(deleted as u64)
    }

    pub fn record_count(&self) -> Result<u64, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(1) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        partition_key: row.get(1)?,
        title: row.get(2)?,
        icon_ref: row.get(3)?,
        occurrence_count: row.get(4)?,
        last_seen_ms: row.get(5)?,
    })
}
