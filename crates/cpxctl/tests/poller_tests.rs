//! Fan-out/fan-in pass behavior: exactly-once completion, arrival
//! order aggregation, and the all-or-nothing error policy.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::FakeInventory;
use cpx_common::{AggregationMode, CpxError, RowSet, RowTable};
use cpxctl::client::Inventory;
use cpxctl::poller::run_pass;
use cpxctl::render::render_table;

fn fleet(n: usize) -> FakeInventory {
    let mut fake = FakeInventory::new();
    for i in 0..n {
        fake = fake.instance(&format!("10.58.1.{i}"), "GeoService", "50%", "40%");
    }
    fake
}

#[tokio::test(flavor = "multi_thread")]
async fn test_every_address_fetched_exactly_once() {
    let fake = Arc::new(fleet(20));
    let addresses = fake.servers().await.unwrap();

    let mut table = RowTable::new(AggregationMode::Default);
    run_pass(&fake, &addresses, 4, &mut table, None)
        .await
        .unwrap();

    let fetched = fake.fetched_addresses();
    assert_eq!(fetched.len(), 20);
    let unique: HashSet<_> = fetched.iter().collect();
    assert_eq!(unique.len(), 20, "an address was fetched more than once");

    let RowSet::Default(rows) = table.get("GeoService").unwrap() else {
        panic!("expected default rows");
    };
    assert_eq!(rows.len(), 20);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_more_workers_than_addresses() {
    let fake = Arc::new(fleet(3));
    let addresses = fake.servers().await.unwrap();

    let mut table = RowTable::new(AggregationMode::Default);
    run_pass(&fake, &addresses, 16, &mut table, None)
        .await
        .unwrap();

    assert_eq!(fake.fetched_addresses().len(), 3);
}

#[tokio::test]
async fn test_single_worker_preserves_queue_order() {
    let fake = Arc::new(
        FakeInventory::new()
            .instance("10.0.0.1", "GeoService", "51%", "76%")
            .instance("10.0.0.2", "GeoService", "81%", "8%")
            .instance("10.0.0.3", "GeoService", "43%", "9%"),
    );
    let addresses = fake.servers().await.unwrap();

    let mut table = RowTable::new(AggregationMode::Merged);
    run_pass(&fake, &addresses, 1, &mut table, None)
        .await
        .unwrap();

    // With one worker the fold order is the queue order, so the
    // running-average sequence matches the documented formula.
    let RowSet::Merged(row) = table.get("GeoService").unwrap() else {
        panic!("expected merged row");
    };
    assert_eq!(row.cpu_avg, 58);
    assert_eq!(row.mem_avg, 31);
    assert_eq!(row.replica_count, 3);
}

#[tokio::test]
async fn test_empty_address_list_completes() {
    let fake = Arc::new(FakeInventory::new());
    let mut table = RowTable::new(AggregationMode::Default);
    run_pass(&fake, &[], 4, &mut table, None).await.unwrap();
    assert!(table.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_one_unreachable_instance_aborts_the_pass() {
    let fake = Arc::new(
        FakeInventory::new()
            .instance("10.0.0.1", "GeoService", "50%", "40%")
            .failing("10.0.0.2")
            .instance("10.0.0.3", "GeoService", "50%", "40%"),
    );
    let addresses = fake.servers().await.unwrap();

    let mut table = RowTable::new(AggregationMode::Default);
    let err = run_pass(&fake, &addresses, 2, &mut table, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CpxError::Fetch(_)));
}

#[tokio::test]
async fn test_unparseable_percentage_aborts_the_pass() {
    let fake = Arc::new(FakeInventory::new().instance("10.0.0.1", "GeoService", "hot", "40%"));
    let addresses = fake.servers().await.unwrap();

    let mut table = RowTable::new(AggregationMode::Default);
    let err = run_pass(&fake, &addresses, 1, &mut table, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CpxError::Parse(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_finalized_table_renders_identically_twice() {
    let fake = Arc::new(
        FakeInventory::new()
            .instance("10.0.0.1", "GeoService", "95%", "10%")
            .instance("10.0.0.2", "AuthService", "10%", "10%"),
    );
    let addresses = fake.servers().await.unwrap();

    let mut table = RowTable::new(AggregationMode::Default);
    run_pass(&fake, &addresses, 2, &mut table, None)
        .await
        .unwrap();

    assert_eq!(render_table(&table, ""), render_table(&table, ""));
}
