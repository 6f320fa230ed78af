#![forbid(unsafe_code)]

//! Free-text query parsing, filtering, and display ordering.
//!
//! A query of the form `field:needle` scopes matching to one field when the
//! prefix names a known field; anything else is an unscoped substring match
//! over partition key, id, and title. Parsing never fails: unknown prefixes
//! degrade to an unscoped query over the whole raw string.

use crate::record::Record;
use std::cmp::Ordering;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryScope {
    Domain,
    Url,
    Title,
    Date,
}

impl QueryScope {
    fn from_field(field: &str) -> Option<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "domain" => Some(Self::Domain),
            "url" => Some(Self::Url),
            "title" => Some(Self::Title),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedQuery {
    pub scope: Option<QueryScope>,
    /// Needle, lowercased; empty means "match everything".
    pub needle: String,
}

pub fn parse(raw: &str) -> ParsedQuery {
    let trimmed = raw.trim();
    if let Some((field, rest)) = trimmed.split_once(':') {
        if let Some(scope) = QueryScope::from_field(field) {
            return ParsedQuery {
                scope: Some(scope),
                needle: rest.trim().to_lowercase(),
            };
        }
    }
    ParsedQuery {
        scope: None,
        needle: trimmed.to_lowercase(),
    }
}

pub fn matches(record: &Record, query: &ParsedQuery) -> bool {
    if query.needle.is_empty() {
        return true;
    }
    match query.scope {
        Some(QueryScope::Domain) => record.partition_key.to_lowercase().contains(&query.needle),
        Some(QueryScope::Url) => record.id.to_lowercase().contains(&query.needle),
        Some(QueryScope::Title) => record.title.to_lowercase().contains(&query.needle),
        Some(QueryScope::Date) => calendar_day(record.last_seen_ms).contains(&query.needle),
        None => {
            let haystack = format!(
                "{} {} {}",
                record.partition_key, record.id, record.title
            )
            .to_lowercase();
            haystack.contains(&query.needle)
        }
    }
}

/// `last_seen_ms` as a fixed-width UTC calendar string (`YYYY-MM-DD`).
pub fn calendar_day(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    format!(
        "{:04}-{:02}-{:02}",
        dt.year(),
        u8::from(dt.month()),
        dt.day()
    )
}

/// Display order: most recent first, then partition, then occurrence count,
/// with id as the final tie-break so the order is a strict total order.
pub fn compare(a: &Record, b: &Record) -> Ordering {
    b.last_seen_ms
        .cmp(&a.last_seen_ms)
        .then_with(|| a.partition_key.cmp(&b.partition_key))
        .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort(records: &mut [Record]) {
    records.sort_by(compare);
}

/// Filters `records` by `raw` and sorts the survivors for display.
pub fn search(mut records: Vec<Record>, raw: &str) -> Vec<Record> {
    let parsed = parse(raw);
    records.retain(|record| matches(record, &parsed));
    sort(&mut records);
    records
}
