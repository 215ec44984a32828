//! Report files written to disk.

use std::fs;

use aero_load::LoadFailure;
use aero_model::{EntityKind, Feed, RawRecord, RejectedRecord, RunStats};
use aero_report::{RejectionReport, RunReport, TIMESTAMP_FORMAT, format_timestamp};
use chrono::NaiveDate;
use tempfile::TempDir;

const TS: &str = "20240101_103000";

fn rejected_fare() -> RejectedRecord {
    RejectedRecord::new(
        RawRecord::from_pairs(
            2,
            [
                ("flight_number", "AB123"),
                ("fare_class", "economy"),
                ("price", "-5"),
            ],
        ),
        vec!["Invalid value: price cannot be negative".to_string()],
    )
}

fn duplicate_flight() -> LoadFailure {
    LoadFailure {
        index: 4,
        field: "flight_number",
        key: "CD456".to_string(),
        message: "Flight creation failed: CD456: integrity violation on flight: duplicate primary key"
            .to_string(),
    }
}

#[test]
fn nothing_rejected_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let errors_dir = dir.path().join("errors");
    let report = RejectionReport {
        feed: Feed::Flights,
        source_file: "flights.csv",
        rejected: &[],
        failures: &[],
    };

    assert!(report.write(&errors_dir, TS).unwrap().is_none());
    assert!(!errors_dir.exists());
}

#[test]
fn rejection_csv_has_union_of_fields_and_meta_columns() {
    let dir = TempDir::new().unwrap();
    let rejected = [
        rejected_fare(),
        RejectedRecord::new(
            RawRecord::from_pairs(5, [("flight_number", "ZZ1"), ("availability", "3")]),
            vec![
                "Unresolved reference: flight ZZ1 not found".to_string(),
                "Missing required fields: price".to_string(),
            ],
        ),
    ];
    let report = RejectionReport {
        feed: Feed::Fares,
        source_file: "fares.csv",
        rejected: &rejected,
        failures: &[],
    };

    let written = report.write(dir.path(), TS).unwrap().unwrap();
    assert_eq!(
        written.errors_csv.file_name().unwrap(),
        "fares_errors_20240101_103000.csv"
    );
    let csv = fs::read_to_string(&written.errors_csv).unwrap();
    insta::assert_snapshot!(csv, @r"
    flight_number,fare_class,price,availability,_errors,_original_index
    AB123,economy,-5,,Invalid value: price cannot be negative,2
    ZZ1,,,3,Unresolved reference: flight ZZ1 not found; Missing required fields: price,5
    ");
}

#[test]
fn load_failures_are_reported_with_their_key() {
    let dir = TempDir::new().unwrap();
    let failures = [duplicate_flight()];
    let report = RejectionReport {
        feed: Feed::Flights,
        source_file: "flights.csv",
        rejected: &[],
        failures: &failures,
    };

    let written = report.write(dir.path(), TS).unwrap().unwrap();
    let csv = fs::read_to_string(&written.errors_csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("flight_number,_errors,_original_index"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("CD456,"));
    assert!(row.ends_with(",4"));
    assert_eq!(lines.next(), None);
}

#[test]
fn rejection_summary_counts_categories() {
    let dir = TempDir::new().unwrap();
    let rejected = [rejected_fare()];
    let failures = [duplicate_flight()];
    let report = RejectionReport {
        feed: Feed::Fares,
        source_file: "fares.csv",
        rejected: &rejected,
        failures: &failures,
    };

    let written = report.write(dir.path(), TS).unwrap().unwrap();
    assert_eq!(
        written.summary_json.file_name().unwrap(),
        "fares_summary_20240101_103000.json"
    );
    let json = fs::read_to_string(&written.summary_json).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "source_file": "fares.csv",
      "feed": "fares",
      "timestamp": "20240101_103000",
      "total_errors": 2,
      "error_categories": {
        "Flight creation failed": 1,
        "Invalid value": 1
      }
    }
    "#);
}

fn flight_stats() -> RunStats {
    let mut stats = RunStats::new(Feed::Flights).with_source_file("flights.csv");
    stats.record_partition(4, 3, 1);
    stats.record_created(EntityKind::Flights);
    stats.record_created(EntityKind::Flights);
    stats.record_error("Flight creation failed: CD456: duplicate");
    stats
}

#[test]
fn run_report_aggregates_feeds() {
    let dir = TempDir::new().unwrap();
    let mut fares = RunStats::new(Feed::Fares).with_source_file("fares.csv");
    fares.record_partition(2, 2, 0);
    fares.record_created(EntityKind::Fares);
    fares.record_created(EntityKind::Fares);

    let report = RunReport::new(TS, &[flight_stats(), fares]);
    let path = report.write(&dir.path().join("output")).unwrap();
    assert_eq!(path.file_name().unwrap(), "etl_report_20240101_103000.json");

    let json = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "timestamp": "20240101_103000",
      "statistics": {
        "fares": {
          "source_file": "fares.csv",
          "total_processed": 2,
          "valid_records": 2,
          "error_records": 0,
          "fares_created": 2,
          "load_error_count": 0,
          "errors": []
        },
        "flights": {
          "source_file": "flights.csv",
          "total_processed": 4,
          "valid_records": 3,
          "error_records": 1,
          "flights_created": 2,
          "load_error_count": 1,
          "errors": [
            "Flight creation failed: CD456: duplicate"
          ]
        }
      },
      "summary": {
        "total_processed": 6,
        "total_valid": 5,
        "total_loaded": 4,
        "total_errors": 2,
        "success_rate": 83.33
      }
    }
    "#);
}

#[test]
fn failed_feed_is_reported_as_error_entry() {
    let mut failed = RunStats::new(Feed::Passengers).with_source_file("passengers.xlsx");
    failed.fail("malformed source passengers.xlsx: bad zip");

    let report = RunReport::new(TS, &[failed]);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(
        value["statistics"]["passengers"],
        serde_json::json!({ "error": "malformed source passengers.xlsx: bad zip" })
    );
    assert_eq!(value["summary"]["success_rate"], serde_json::json!(0.0));
}

#[test]
fn repeated_feed_gets_file_qualified_key() {
    let mut second = RunStats::new(Feed::Flights).with_source_file("more_flights.csv");
    second.record_partition(1, 1, 0);

    let report = RunReport::new(TS, &[flight_stats(), second]);
    let keys: Vec<_> = report.statistics.keys().cloned().collect();
    assert_eq!(keys, ["flights", "flights:more_flights.csv"]);
    assert_eq!(report.summary.total_processed, 5);
}

#[test]
fn timestamp_matches_file_name_format() {
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    assert_eq!(format_timestamp(at), TS);
    assert_eq!(at.format(TIMESTAMP_FORMAT).to_string().len(), 15);
}
