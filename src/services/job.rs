//! One acquisition cycle: fetch, store, prune, compare, log.

use chrono::Local;
use thiserror::Error;

use crate::acquisition::ProductSource;
use crate::diff;
use crate::domain::comparison::{NewComparison, RunDiff};
use crate::domain::types::{RetentionWindow, RunId};
use crate::repository::{ComparisonLogWriter, RepositoryError, SnapshotReader, SnapshotWriter};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    /// The source failed. Nothing was written.
    #[error("acquisition failed: {0}")]
    AcquisitionFailed(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// Stored or computed data could not be represented.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for JobError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::StorageUnavailable(message) => JobError::StorageUnavailable(message),
            RepositoryError::ValidationError(message) => JobError::InvalidData(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSettings {
    pub retention: RetentionWindow,
    /// Whether a comparison with fewer than two stored runs is still logged.
    pub log_degenerate_comparisons: bool,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            retention: RetentionWindow::DEFAULT,
            log_degenerate_comparisons: true,
        }
    }
}

/// Outcome of a completed cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub run_id: RunId,
    pub product_count: usize,
    pub pruned_rows: usize,
    pub ts1: Option<RunId>,
    pub ts2: Option<RunId>,
    pub diff: RunDiff,
    /// Whether a comparison log row was written.
    pub logged: bool,
}

/// Runs acquisition cycles against a store and a product source.
pub struct ScrapeJob<R, S> {
    repo: R,
    source: S,
    settings: JobSettings,
}

impl<R, S> ScrapeJob<R, S>
where
    R: SnapshotReader + SnapshotWriter + ComparisonLogWriter,
    S: ProductSource,
{
    pub fn new(repo: R, source: S, settings: JobSettings) -> Self {
        Self {
            repo,
            source,
            settings,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Executes one cycle.
    ///
    /// The new run is stored before pruning, and the comparison always uses
    /// the two most recent runs left after pruning. An acquisition failure
    /// aborts before anything is written.
    pub fn run(&self) -> Result<JobReport, JobError> {
        let products = match self.source.fetch_all_data() {
            Ok(products) => products,
            Err(e) => {
                log::error!("Failed to acquire products: {e}");
                return Err(JobError::AcquisitionFailed(e.to_string()));
            }
        };

        let run_id = self.repo.append(&products)?;
        log::info!("Stored run {run_id} with {} product(s)", products.len());

        let pruned_rows = self.repo.prune_to_latest(self.settings.retention)?;
        if pruned_rows > 0 {
            log::info!(
                "Pruned {pruned_rows} row(s) outside the latest {} run(s)",
                self.settings.retention
            );
        }

        let run_ids = self.repo.list_run_ids()?;
        let (ts1, ts2) = latest_two(&run_ids);

        let diff = match (&ts1, &ts2) {
            (Some(older), Some(newer)) => {
                diff::compare(&self.repo.read_run(older)?, &self.repo.read_run(newer)?)
            }
            _ => RunDiff::default(),
        };

        let degenerate = run_ids.len() < 2;
        let logged = if degenerate && !self.settings.log_degenerate_comparisons {
            log::info!("Fewer than two runs stored, comparison not logged");
            false
        } else {
            let row = NewComparison::from_diff(
                ts1.clone(),
                ts2.clone(),
                &diff,
                Local::now().naive_local(),
            )
            .map_err(|e| JobError::InvalidData(e.to_string()))?;
            self.repo.log_comparison(&row)?;
            true
        };

        log::info!(
            "Compared {} to {}: {} new, {} removed, {} updated",
            ts1.as_ref().map(RunId::as_str).unwrap_or("-"),
            ts2.as_ref().map(RunId::as_str).unwrap_or("-"),
            diff.new_count(),
            diff.removed_count(),
            diff.updated_count()
        );

        Ok(JobReport {
            run_id,
            product_count: products.len(),
            pruned_rows,
            ts1,
            ts2,
            diff,
            logged,
        })
    }
}

/// The two most recent runs, older first. A single run is compared with itself.
fn latest_two(run_ids: &[RunId]) -> (Option<RunId>, Option<RunId>) {
    match run_ids {
        [] => (None, None),
        [only] => (Some(only.clone()), Some(only.clone())),
        [.., older, newer] => (Some(older.clone()), Some(newer.clone())),
    }
}
