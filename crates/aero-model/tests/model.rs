//! Tests for aero-model serialization.

use aero_model::{EntityKind, Feed, RunStats, RunSummary};

#[test]
fn run_stats_serialize_with_created_counters_inline() {
    let mut stats = RunStats::new(Feed::Passengers).with_source_file("passengers.csv");
    stats.record_partition(3, 2, 1);
    stats.record_created(EntityKind::Passengers);
    stats.record_created(EntityKind::Passengers);
    stats.record_created(EntityKind::Documents);
    stats.record_error("Unknown document type: SEAMAN_ID");

    let json = serde_json::to_value(&stats).expect("serialize stats");
    assert_eq!(json["source_file"], "passengers.csv");
    assert_eq!(json["total_processed"], 3);
    assert_eq!(json["valid_records"], 2);
    assert_eq!(json["error_records"], 1);
    assert_eq!(json["passengers_created"], 2);
    assert_eq!(json["documents_created"], 1);
    assert_eq!(json["load_error_count"], 1);
    assert_eq!(json["errors"][0], "Unknown document type: SEAMAN_ID");
    assert!(json.get("error").is_none());
    assert!(json.get("errors_truncated").is_none());
}

#[test]
fn failed_feed_serializes_error() {
    let mut stats = RunStats::new(Feed::Fares);
    stats.fail("malformed source");
    let json = serde_json::to_value(&stats).expect("serialize stats");
    assert_eq!(json["error"], "malformed source");
    assert_eq!(json["fares_created"], 0);
}

#[test]
fn summary_counts_load_errors() {
    let mut flights = RunStats::new(Feed::Flights);
    flights.record_partition(4, 4, 0);
    flights.record_created(EntityKind::Flights);
    flights.record_created(EntityKind::Flights);
    flights.record_created(EntityKind::Flights);
    flights.record_error("Flight creation failed: AB123: duplicate");

    let summary = RunSummary::from_stats([&flights]);
    assert_eq!(summary.total_processed, 4);
    assert_eq!(summary.total_valid, 4);
    assert_eq!(summary.total_loaded, 3);
    assert_eq!(summary.total_errors, 1);
    assert_eq!(summary.success_rate, 100.0);
}
