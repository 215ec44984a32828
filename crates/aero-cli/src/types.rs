use aero_cli::pipeline::RunOutcome;
use aero_load::StoreCounts;

#[derive(Debug)]
pub struct EtlResult {
    pub outcome: RunOutcome,
    /// Entities held by the store once the run finished.
    pub store_counts: StoreCounts,
}
