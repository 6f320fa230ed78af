#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension, Transaction, params};
use std::collections::BTreeSet;
use tb_core::{CanonicalLocator, CaptureOptions, canonicalize};

const MAX_LOCATOR_LEN: usize = 8192;
const MAX_TITLE_LEN: usize = 4096;

/// Locator prefixes the host UI owns; reopening these later is pointless,
/// so they are never archived. Matched case-insensitively.
const HOST_UI_PREFIXES: &[&str] = &[
    "about:",
    "brave:",
    "chrome:",
    "chrome-extension:",
    "devtools:",
    "edge:",
    "file:",
    "moz-extension:",
    "view-source:",
];

impl SqliteStore {
    /// Merges one capture batch into the store as a single transaction.
    ///
    /// Each surviving descriptor is canonicalized and upserted: a known id
    /// gains one occurrence and a fresh `last_seen_ms` (icon filled only if
    /// still empty), an unknown id becomes a new record. Duplicate canonical
    /// ids inside the batch collapse to one merge so the occurrence count
    /// tracks batches, not tabs. Any failure rolls the whole batch back.
    pub fn capture_tabs(
        &mut self,
        request: CaptureTabsRequest,
    ) -> Result<CaptureReport, StoreError> {
        let tx = self.conn.transaction()?;
        let mut report = CaptureReport::default();
        let mut batch_ids = BTreeSet::new();

        for tab in &request.tabs {
            if tab.locator.len() > MAX_LOCATOR_LEN {
                return Err(StoreError::InvalidInput("tab.locator is too long"));
            }
            if tab.title.len() > MAX_TITLE_LEN {
                return Err(StoreError::InvalidInput("tab.title is too long"));
            }

            if is_excluded(&tab.locator, &request.options) {
                report.skipped += 1;
                continue;
            }

            let canonical = canonicalize(tab.locator.trim());
            if !batch_ids.insert(canonical.id.clone()) {
                report.skipped += 1;
                continue;
            }

            let icon = tab.icon_ref.as_deref().unwrap_or("");
            if upsert_page_tx(&tx, &canonical, &tab.title, icon, request.now_ms)? {
                report.captured += 1;
            } else {
                report.merged += 1;
            }
        }

        tx.commit()?;
        Ok(report)
    }
}

pub(super) fn is_excluded(locator: &str, options: &CaptureOptions) -> bool {
    let trimmed = locator.trim();
    if trimmed.is_empty() {
        return true;
    }

    let lowered = trimmed.to_ascii_lowercase();
    if HOST_UI_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return true;
    }

    options
        .blocked_prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && trimmed.starts_with(prefix.as_str()))
}

/// Returns true when a new record was inserted, false on a merge.
fn upsert_page_tx(
    tx: &Transaction<'_>,
    canonical: &CanonicalLocator,
    title: &str,
    icon: &str,
    now_ms: i64,
) -> Result<bool, StoreError> {
    let exists = tx
        .query_row(
            "SELECT 1 FROM pages WHERE url=?1",
            params![canonical.id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if exists {
        // Title stays as first captured; icon is first-write-wins;
        // last_seen_ms never moves backwards.
        tx.execute(
            "UPDATE pages SET \
               seen_count = seen_count + 1, \
               last_seen_ms = MAX(last_seen_ms, ?2), \
               icon = CASE WHEN icon = '' THEN ?3 ELSE icon END \
             WHERE url = ?1",
            params![canonical.id, now_ms, icon],
        )?;
        Ok(false)
    } else {
        tx.execute(
            "INSERT INTO pages(url, domain, title, icon, seen_count, last_seen_ms) \
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
            params![canonical.id, canonical.partition_key, title, icon, now_ms],
        )?;
        Ok(true)
    }
}
