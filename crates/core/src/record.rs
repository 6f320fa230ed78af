#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

pub const MS_PER_DAY: i64 = 86_400_000;

/// One archived tab entry, keyed by canonical locator.
///
/// `id` and `partition_key` are fixed at creation; every later capture of the
/// same locator bumps `occurrence_count` and refreshes `last_seen_ms`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub partition_key: String,
    pub title: String,
    /// Empty until a capture supplies one; first-write-wins after that.
    pub icon_ref: String,
    /// Number of capture batches that have included this id. Always >= 1.
    pub occurrence_count: i64,
    pub last_seen_ms: i64,
}

/// Untrusted tab snapshot handed over by the host at capture time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    pub locator: String,
    pub title: String,
    pub icon_ref: Option<String>,
}

/// Capture-side filtering knobs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Locator prefixes the user never wants archived.
    pub blocked_prefixes: Vec<String>,
}

/// Retention limits enforced by the sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub max_age_days: i64,
    pub max_per_partition: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age_days: 365,
            max_per_partition: 10_000,
        }
    }
}
