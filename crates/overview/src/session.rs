#![forbid(unsafe_code)]

use std::path::Path;
use tb_core::{CaptureOptions, Record, RetentionPolicy, TabDescriptor, query};
use tb_storage::{
    CaptureReport, CaptureTabsRequest, SqliteStore, StoreError, SweepReport, SweepRequest,
};

/// Owns the store plus the capture and retention knobs, and sequences the
/// two store transactions of an archive cycle: capture first, sweep only
/// after the batch committed.
#[derive(Debug)]
pub struct ArchiveSession {
    store: SqliteStore,
    options: CaptureOptions,
    policy: RetentionPolicy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub capture: CaptureReport,
    pub sweep: SweepReport,
}

impl ArchiveSession {
    pub fn open(
        storage_dir: impl AsRef<Path>,
        options: CaptureOptions,
        policy: RetentionPolicy,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            store: SqliteStore::open(storage_dir)?,
            options,
            policy,
        })
    }

    /// One user-triggered archive cycle.
    ///
    /// On error nothing from this batch is archived; the host must keep its
    /// tabs open (closing them is the host's optional post-capture step and
    /// must only happen after this returns Ok).
    pub fn archive_cycle(
        &mut self,
        tabs: Vec<TabDescriptor>,
        now_ms: i64,
    ) -> Result<CycleReport, StoreError> {
        let capture = self.store.capture_tabs(CaptureTabsRequest {
            tabs,
            now_ms,
            options: self.options.clone(),
        })?;
        let sweep = self.store.sweep(SweepRequest {
            now_ms,
            policy: self.policy,
        })?;
        Ok(CycleReport { capture, sweep })
    }

    /// Read-only query over a consistent snapshot, sorted for display.
    pub fn search(&self, raw: &str) -> Result<Vec<Record>, StoreError> {
        Ok(query::search(self.store.list_records()?, raw))
    }

    pub fn delete_record(&mut self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_record(id)
    }

    pub fn clear_all(&mut self) -> Result<u64, StoreError> {
        self.store.clear_all()
    }

    pub fn record_count(&self) -> Result<u64, StoreError> {
        self.store.record_count()
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }
}
