//! Run orchestration.
//!
//! One [`Orchestrator`] drives one run through its states:
//!
//! 1. **Listing**: supported files in the input directory, by name
//! 2. **Processing feed**: per classified file, passengers, or flights and
//!    then the fares attached to them
//! 3. **Reporting**: the final run report and the aggregate summary
//!
//! A failing file is recorded in its feed's stats and the run moves on;
//! only an unreadable input directory stops a run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use aero_ingest::{FileKind, SourceFormat, TabularReader, classify_file, fare_sibling};
use aero_load::{FareLoader, FlightLoader, LoadFailure, PassengerLoader, Store};
use aero_model::{
    EntityKeyMap, Feed, Partition, RawRecord, RejectedRecord, RunStats, RunSummary,
};
use aero_report::{RejectionReport, RunReport, WrittenRejectionReport, timestamp_now};
use aero_transform::{FareTransformer, FlightTransformer, PassengerTransformer, Transformer};
use aero_validate::{FlightValidator, PassengerValidator};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, error, info, info_span, trace, warn};

use crate::config::EtlConfig;
use crate::logging::redact_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Listing,
    ProcessingFeed,
    Reporting,
    Done,
}

impl RunState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listing => "listing",
            Self::ProcessingFeed => "processing_feed",
            Self::Reporting => "reporting",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub timestamp: String,
    /// Per-feed stats in processing order.
    pub stats: Vec<RunStats>,
    pub summary: RunSummary,
    /// `None` when the run report could not be written.
    pub report_path: Option<PathBuf>,
    pub rejection_reports: Vec<WrittenRejectionReport>,
    /// Listed files that matched no feed.
    pub skipped: Vec<PathBuf>,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.summary.total_errors > 0 || self.stats.iter().any(RunStats::is_failed)
    }
}

/// Drives one run. Consumed by [`Orchestrator::run`]; never reused.
pub struct Orchestrator<'a, S: ?Sized> {
    config: &'a EtlConfig,
    store: &'a mut S,
    state: RunState,
    timestamp: String,
    today: Option<NaiveDate>,
    stats: Vec<RunStats>,
    rejection_reports: Vec<WrittenRejectionReport>,
    report_counts: BTreeMap<Feed, usize>,
    skipped: Vec<PathBuf>,
}

impl<'a, S: Store + ?Sized> Orchestrator<'a, S> {
    pub fn new(config: &'a EtlConfig, store: &'a mut S) -> Self {
        Self {
            config,
            store,
            state: RunState::Idle,
            timestamp: timestamp_now(),
            today: None,
            stats: Vec::new(),
            rejection_reports: Vec::new(),
            report_counts: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Pins the timestamp used in report file names.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Pins the date document expiry is judged against.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Processes every classified file of the input directory and writes
    /// the run report.
    ///
    /// # Errors
    ///
    /// Fails only when the input directory cannot be listed.
    pub fn run(mut self) -> Result<RunOutcome> {
        let span = info_span!("run", timestamp = %self.timestamp);
        let _guard = span.enter();
        let start = Instant::now();

        let config = self.config;
        self.transition(RunState::Listing);
        let input_dir = &config.paths.input_dir;
        let files = info_span!("listing", dir = %input_dir.display()).in_scope(|| {
            aero_ingest::list_supported_files(input_dir)
                .with_context(|| format!("list input directory {}", input_dir.display()))
        })?;
        info!(files = files.len(), "input files listed");

        self.transition(RunState::ProcessingFeed);
        for path in &files {
            match classify_file(path) {
                Some(FileKind::Passengers) => self.process_passenger_file(path),
                Some(FileKind::Flights) => self.process_flight_file(path),
                None => {
                    info!(file = %display_name(path), "no feed matches file name, skipped");
                    self.skipped.push(path.clone());
                }
            }
        }

        self.transition(RunState::Reporting);
        let report = RunReport::new(self.timestamp.clone(), &self.stats);
        let report_path =
            info_span!("reporting").in_scope(|| match report.write(&config.paths.output_dir) {
                Ok(path) => Some(path),
                Err(error) => {
                    error!(%error, "run report not written");
                    None
                }
            });

        self.transition(RunState::Done);
        info!(
            feeds = self.stats.len(),
            total_processed = report.summary.total_processed,
            total_errors = report.summary.total_errors,
            success_rate = report.summary.success_rate,
            duration_ms = start.elapsed().as_millis(),
            "run complete"
        );

        Ok(RunOutcome {
            timestamp: self.timestamp,
            stats: self.stats,
            summary: report.summary,
            report_path,
            rejection_reports: self.rejection_reports,
            skipped: self.skipped,
        })
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    fn new_stats(&self, feed: Feed, source_file: &str) -> RunStats {
        RunStats::new(feed)
            .with_source_file(source_file)
            .with_error_limit(self.config.processing.max_errors)
    }

    fn process_passenger_file(&mut self, path: &Path) {
        let source_file = display_name(path);
        let span = info_span!("feed", feed = %Feed::Passengers, file = %source_file);
        let _guard = span.enter();

        let mut stats = self.new_stats(Feed::Passengers, &source_file);
        if let Err(error) = self.passenger_feed(path, &source_file, &mut stats) {
            fail_feed(&mut stats, &error);
        }
        self.stats.push(stats);
    }

    fn passenger_feed(
        &mut self,
        path: &Path,
        source_file: &str,
        stats: &mut RunStats,
    ) -> Result<()> {
        let records = TabularReader::open(path)?.read_all()?;

        let processing = &self.config.processing;
        let mut validator = PassengerValidator::new(processing.date_format.clone());
        if let Some(today) = self.today {
            validator = validator.with_today(today);
        }
        let partition =
            PassengerTransformer::new(validator, &self.config.mappings).transform(records);
        record_partition(stats, &partition);

        let loaded = PassengerLoader::new(&mut *self.store)
            .with_chunk_size(processing.chunk_size)
            .load(&partition.accepted, stats);
        let failures = self.finish_load(Feed::Passengers, source_file, &partition, loaded)?;
        self.report_rejections(Feed::Passengers, source_file, &partition.rejected, &failures);
        Ok(())
    }

    /// Flights first, then fares under the flights that were loaded.
    ///
    /// A failed flight section leaves the fare feed failed as well, since
    /// no fare could resolve its flight.
    fn process_flight_file(&mut self, path: &Path) {
        let source_file = display_name(path);
        let mut flight_stats = self.new_stats(Feed::Flights, &source_file);
        let flights = {
            let span = info_span!("feed", feed = %Feed::Flights, file = %source_file);
            let _guard = span.enter();
            match self.flight_feed(path, &source_file, &mut flight_stats) {
                Ok(flights) => Some(flights),
                Err(error) => {
                    fail_feed(&mut flight_stats, &error);
                    None
                }
            }
        };
        self.stats.push(flight_stats);

        let section = self.fare_section(path);
        let fare_source = section
            .as_ref()
            .map_or_else(|| source_file.clone(), FareSection::source_file);
        let span = info_span!("feed", feed = %Feed::Fares, file = %fare_source);
        let _guard = span.enter();

        let mut fare_stats = self.new_stats(Feed::Fares, &fare_source);
        match (flights, section) {
            (None, _) => {
                fare_stats.fail(format!(
                    "flight section of {source_file} failed; fares not processed"
                ));
            }
            (Some(_), None) => {
                warn!(file = %source_file, "no fare section found, fares skipped");
            }
            (Some(flights), Some(section)) => {
                if let Err(error) = self.fare_feed(&section, &flights, &mut fare_stats) {
                    fail_feed(&mut fare_stats, &error);
                }
            }
        }
        self.stats.push(fare_stats);
    }

    fn flight_feed(
        &mut self,
        path: &Path,
        source_file: &str,
        stats: &mut RunStats,
    ) -> Result<EntityKeyMap> {
        let processing = &self.config.processing;
        let records = TabularReader::open(path)?
            .with_sheet(processing.flights_sheet.clone())
            .read_all()?;

        let validator = FlightValidator::new(processing.datetime_format.clone());
        let partition = FlightTransformer::new(validator).transform(records);
        record_partition(stats, &partition);

        let loaded = FlightLoader::new(&mut *self.store)
            .with_chunk_size(processing.chunk_size)
            .load(&partition.accepted, stats);
        let load = self.finish_load(Feed::Flights, source_file, &partition, loaded)?;
        self.report_rejections(Feed::Flights, source_file, &partition.rejected, &load.failures);
        Ok(load.flights)
    }

    /// Where the fares of a flight file live: the fare sheet of the same
    /// workbook, or a sibling CSV file. `None` when there is neither.
    fn fare_section(&self, path: &Path) -> Option<FareSection> {
        match SourceFormat::from_path(path) {
            Ok(SourceFormat::Spreadsheet) => {
                let wanted = &self.config.processing.fares_sheet;
                let sheet = match TabularReader::open(path).and_then(|r| r.find_sheet(wanted)) {
                    Ok(Some(name)) => name,
                    Ok(None) => return None,
                    // Unreadable workbooks fail the fare feed when it is read.
                    Err(_) => wanted.clone(),
                };
                Some(FareSection {
                    path: path.to_path_buf(),
                    sheet: Some(sheet),
                })
            }
            _ => fare_sibling(path)
                .filter(|sibling| sibling.is_file())
                .map(|sibling| FareSection {
                    path: sibling,
                    sheet: None,
                }),
        }
    }

    fn fare_feed(
        &mut self,
        section: &FareSection,
        flights: &EntityKeyMap,
        stats: &mut RunStats,
    ) -> Result<()> {
        let mut reader = TabularReader::open(&section.path)?;
        if let Some(sheet) = &section.sheet {
            reader = reader.with_sheet(sheet.clone());
        }
        let records = reader.read_all()?;

        let partition = FareTransformer::new(&self.config.mappings, flights).transform(records);
        record_partition(stats, &partition);

        let source_file = section.source_file();
        let loaded = FareLoader::new(&mut *self.store)
            .with_chunk_size(self.config.processing.chunk_size)
            .load(&partition.accepted, flights, stats);
        let failures = self.finish_load(Feed::Fares, &source_file, &partition, loaded)?;
        self.report_rejections(Feed::Fares, &source_file, &partition.rejected, &failures);
        Ok(())
    }

    /// Passes a successful load through. A failed load still gets the
    /// report of the rows rejected before it.
    fn finish_load<T, L>(
        &mut self,
        feed: Feed,
        source_file: &str,
        partition: &Partition<T>,
        loaded: aero_load::Result<L>,
    ) -> Result<L> {
        loaded.or_else(|error| {
            self.report_rejections(feed, source_file, &partition.rejected, &[]);
            Err(error.into())
        })
    }

    /// Writes the feed's rejection report. A lost report is logged only.
    fn report_rejections(
        &mut self,
        feed: Feed,
        source_file: &str,
        rejected: &[RejectedRecord],
        failures: &[LoadFailure],
    ) {
        let report = RejectionReport {
            feed,
            source_file,
            rejected,
            failures,
        };
        if report.is_empty() {
            return;
        }

        // A feed seen twice in one run gets numbered report files.
        let count = self.report_counts.entry(feed).or_insert(0);
        *count += 1;
        let timestamp = if *count == 1 {
            self.timestamp.clone()
        } else {
            format!("{}_{count}", self.timestamp)
        };

        match report.write(&self.config.paths.errors_dir, &timestamp) {
            Ok(Some(written)) => self.rejection_reports.push(written),
            Ok(None) => {}
            Err(error) => error!(%feed, %error, "rejection report not written"),
        }
    }
}

struct FareSection {
    path: PathBuf,
    sheet: Option<String>,
}

impl FareSection {
    fn source_file(&self) -> String {
        display_name(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn fail_feed(stats: &mut RunStats, error: &anyhow::Error) {
    let message = format!("{error:#}");
    error!(feed = %stats.feed, error = %message, "feed failed");
    stats.fail(message);
}

fn record_partition<T>(stats: &mut RunStats, partition: &Partition<T>) {
    stats.record_partition(
        partition.total(),
        partition.accepted.len(),
        partition.rejected.len(),
    );
    for row in &partition.rejected {
        trace!(
            row = row.index(),
            values = %render_row(row.record()),
            errors = %row.errors().join("; "),
            "rejected row"
        );
    }
}

fn render_row(record: &RawRecord) -> String {
    record
        .iter()
        .map(|(name, value)| format!("{name}={}", redact_value(&value.render())))
        .collect::<Vec<_>>()
        .join(", ")
}
