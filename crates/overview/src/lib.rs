#![forbid(unsafe_code)]

pub mod rows;
pub mod session;
pub mod viewport;

pub use rows::{RowBinding, RowContent, bind_visible};
pub use session::{ArchiveSession, CycleReport};
pub use viewport::{Slot, Viewport, ViewportConfig, ViewportError};
