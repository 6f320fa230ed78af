#![forbid(unsafe_code)]

mod store;

pub use store::{
    CaptureReport, CaptureTabsRequest, SqliteStore, StoreError, SweepReport, SweepRequest,
};
