#![forbid(unsafe_code)]

use tb_core::{CaptureOptions, MS_PER_DAY, RetentionPolicy, TabDescriptor};
use tb_storage::{CaptureTabsRequest, SqliteStore, SweepRequest};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("tb_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn capture_one(store: &mut SqliteStore, locator: &str, now_ms: i64) {
    store
        .capture_tabs(CaptureTabsRequest {
            tabs: vec![TabDescriptor {
                locator: locator.to_string(),
                title: String::new(),
                icon_ref: None,
            }],
            now_ms,
            options: CaptureOptions::default(),
        })
        .expect("capture batch");
}

fn sweep(store: &mut SqliteStore, now_ms: i64, max_age_days: i64, max_per_partition: usize) -> tb_storage::SweepReport {
    store
        .sweep(SweepRequest {
            now_ms,
            policy: RetentionPolicy {
                max_age_days,
                max_per_partition,
            },
        })
        .expect("sweep")
}

#[test]
fn age_sweep_removes_stale_and_keeps_fresh() {
    let mut store = SqliteStore::open(temp_dir("age_sweep")).expect("open store");
    let now = 1_000 * MS_PER_DAY;

    capture_one(&mut store, "https://old.example/page", now - 400 * MS_PER_DAY);
    capture_one(&mut store, "https://fresh.example/page", now - 100 * MS_PER_DAY);

    let report = sweep(&mut store, now, 365, 10_000);
    assert_eq!(report.expired, 1);

    let records = store.list_records().expect("list records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "https://fresh.example/page");
}

#[test]
fn record_exactly_at_the_horizon_is_retained() {
    let mut store = SqliteStore::open(temp_dir("age_horizon")).expect("open store");
    let now = 1_000 * MS_PER_DAY;

    capture_one(&mut store, "https://edge.example/page", now - 365 * MS_PER_DAY);

    let report = sweep(&mut store, now, 365, 10_000);
    assert_eq!(report.expired, 0);
    assert_eq!(store.record_count().expect("count"), 1);
}

#[test]
fn partition_cap_keeps_the_most_recent_records() {
    let mut store = SqliteStore::open(temp_dir("partition_cap")).expect("open store");
    let base = 1_000 * MS_PER_DAY;

    for i in 0..15 {
        capture_one(
            &mut store,
            &format!("https://example.com/p{i:02}"),
            base + i * 1_000,
        );
    }

    let report = sweep(&mut store, base + 15_000, 365, 10);
    assert_eq!(report.capped, 5);

    let records = store.list_records().expect("list records");
    assert_eq!(records.len(), 10);
    // Survivors are exactly the 10 with the largest last_seen_ms.
    let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    let expected: Vec<String> = (5..15)
        .map(|i| format!("https://example.com/p{i:02}"))
        .collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn cap_is_enforced_per_partition() {
    let mut store = SqliteStore::open(temp_dir("cap_per_partition")).expect("open store");
    let base = 1_000 * MS_PER_DAY;

    for i in 0..12 {
        capture_one(&mut store, &format!("https://a.com/p{i}"), base + i);
        capture_one(&mut store, &format!("https://b.org/p{i}"), base + i);
    }

    let report = sweep(&mut store, base + 100, 365, 10);
    assert_eq!(report.capped, 4);

    let records = store.list_records().expect("list records");
    assert_eq!(
        records
            .iter()
            .filter(|r| r.partition_key == "a.com")
            .count(),
        10
    );
    assert_eq!(
        records
            .iter()
            .filter(|r| r.partition_key == "b.org")
            .count(),
        10
    );
}

#[test]
fn sweep_is_idempotent() {
    let mut store = SqliteStore::open(temp_dir("sweep_idempotent")).expect("open store");
    let now = 1_000 * MS_PER_DAY;

    capture_one(&mut store, "https://old.example/page", now - 400 * MS_PER_DAY);
    for i in 0..12 {
        capture_one(&mut store, &format!("https://a.com/p{i}"), now - i * 1_000);
    }

    let first = sweep(&mut store, now, 365, 10);
    assert_eq!(first.expired, 1);
    assert_eq!(first.capped, 2);

    let second = sweep(&mut store, now, 365, 10);
    assert_eq!(second.expired, 0);
    assert_eq!(second.capped, 0);
    assert_eq!(store.record_count().expect("count"), 10);
}

#[test]
fn sweep_on_an_empty_store_is_a_no_op() {
    let mut store = SqliteStore::open(temp_dir("sweep_empty")).expect("open store");
    let report = sweep(&mut store, 1_000 * MS_PER_DAY, 365, 10);
    assert_eq!(report.expired, 0);
    assert_eq!(report.capped, 0);
}
