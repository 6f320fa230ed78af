#![forbid(unsafe_code)]

mod canonical;
pub mod query;
mod record;

pub use canonical::{CanonicalLocator, FALLBACK_PARTITION, canonicalize};
pub use record::{CaptureOptions, MS_PER_DAY, Record, RetentionPolicy, TabDescriptor};
