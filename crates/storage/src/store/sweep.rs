#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;
use tb_core::MS_PER_DAY;

/// Named orderings the sweep walks. Each is a lazy, restartable row cursor
/// backed by a secondary index, so a pass never loads the table into memory.
#[derive(Clone, Copy, Debug)]
enum RecordOrder {
    LastSeenAsc,
    PartitionNewestFirst,
}

impl RecordOrder {
    fn sql(self) -> &'static str {
        match self {
            Self::LastSeenAsc => {
                "SELECT url, domain, last_seen_ms FROM pages \
                 ORDER BY last_seen_ms ASC, url ASC"
            }
            Self::PartitionNewestFirst => {
                "SELECT url, domain, last_seen_ms FROM pages \
                 ORDER BY domain ASC, last_seen_ms DESC, url ASC"
            }
        }
    }
}

impl SqliteStore {
    /// Enforces retention limits: an age horizon, then a per-partition cap.
    ///
    /// Runs strictly after a capture batch has committed, each pass in its
    /// own transaction. A delete that fails is logged and skipped; the
    /// sweep is idempotent and converges on the next run.
    pub fn sweep(&mut self, request: SweepRequest) -> Result<SweepReport, StoreError> {
        let horizon = request
            .now_ms
            .saturating_sub(request.policy.max_age_days.saturating_mul(MS_PER_DAY));
        let expired = self.sweep_age(horizon)?;
        let capped = self.sweep_partition_caps(request.policy.max_per_partition)?;
        Ok(SweepReport { expired, capped })
    }

    fn sweep_age(&mut self, horizon_ms: i64) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        let mut deleted = 0u64;
        {
            let mut stmt = tx.prepare(RecordOrder::LastSeenAsc.sql())?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let url: String = row.get(0)?;
                let last_seen_ms: i64 = row.get(2)?;
                if last_seen_ms >= horizon_ms {
                    // Ascending order: every record after this one is fresh.
                    break;
                }
                match tx.execute("DELETE FROM pages WHERE url=?1", params![url]) {
                    Ok(_) => deleted += 1,
                    Err(err) => log::warn!("age sweep: delete failed for {url}: {err}"),
                }
            }
        }
        tx.commit()?;
        Ok(deleted)
    }

    fn sweep_partition_caps(&mut self, max_per_partition: usize) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        let mut deleted = 0u64;
        {
            let mut stmt = tx.prepare(RecordOrder::PartitionNewestFirst.sql())?;
            let mut rows = stmt.query([])?;
            let mut current_partition: Option<String> = None;
            let mut observed = 0usize;

            while let Some(row) = rows.next()? {
                let url: String = row.get(0)?;
                let domain: String = row.get(1)?;

                if current_partition.as_deref() != Some(domain.as_str()) {
                    current_partition = Some(domain);
                    observed = 0;
                }

                // Newest-first within the partition, so everything past the
                // cap is the partition's oldest tail.
                if observed >= max_per_partition {
                    match tx.execute("DELETE FROM pages WHERE url=?1", params![url]) {
                        Ok(_) => deleted += 1,
                        Err(err) => log::warn!("cap sweep: delete failed for {url}: {err}"),
                    }
                }
                observed += 1;
            }
        }
        tx.commit()?;
        Ok(deleted)
    }
}
