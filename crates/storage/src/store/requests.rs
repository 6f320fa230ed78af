#![forbid(unsafe_code)]

use tb_core::{CaptureOptions, RetentionPolicy, TabDescriptor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureTabsRequest {
    pub tabs: Vec<TabDescriptor>,
    pub now_ms: i64,
    pub options: CaptureOptions,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureReport {
    /// Previously-unseen locators inserted as fresh records.
    pub captured: u64,
    /// Locators merged into an existing record.
    pub merged: u64,
    /// Descriptors dropped by the exclusion filter or in-batch dedup.
    pub skipped: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepRequest {
    pub now_ms: i64,
    pub policy: RetentionPolicy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records removed by the age pass.
    pub expired: u64,
    /// Records removed by the per-partition cap pass.
    pub capped: u64,
}
