#![forbid(unsafe_code)]

use crate::viewport::Viewport;
use tb_core::Record;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Field bundle a display slot is populated with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowContent {
    pub domain: String,
    pub locator: String,
    pub title: String,
    pub icon_ref: String,
    pub occurrence_count: i64,
    pub last_seen: String,
}

impl RowContent {
    pub fn from_record(record: &Record) -> Self {
        Self {
            domain: record.partition_key.clone(),
            locator: record.id.clone(),
            title: record.title.clone(),
            icon_ref: record.icon_ref.clone(),
            occurrence_count: record.occurrence_count,
            last_seen: ts_ms_to_rfc3339(record.last_seen_ms),
        }
    }
}

/// One visible slot, ready for the display surface to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowBinding {
    pub slot: usize,
    pub top_px: u64,
    pub content: RowContent,
}

/// Binds the viewport's visible slots to their records. Hidden slots are
/// omitted; the caller hides them wholesale.
pub fn bind_visible(viewport: &Viewport, records: &[Record]) -> Vec<RowBinding> {
    viewport
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(slot, state)| {
            let index = state.item_index?;
            let record = records.get(index)?;
            Some(RowBinding {
                slot,
                top_px: state.top_px,
                content: RowContent::from_record(record),
            })
        })
        .collect()
}

fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
