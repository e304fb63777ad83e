use crate::db::{DbConnection, DbPool};
use crate::domain::comparison::{NewComparison, StoredComparison};
use crate::domain::product::{NewProduct, Product, Snapshot};
use crate::domain::schedule::ScheduleConfig;
use crate::domain::types::{RetentionWindow, RunId};

pub mod comparison;
pub mod errors;
pub mod product;
pub mod schedule;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between services.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over stored runs.
pub trait SnapshotReader {
    /// Every distinct run identifier, ascending.
    fn list_run_ids(&self) -> RepositoryResult<Vec<RunId>>;
    /// By-name projection of one run. Unknown runs yield an empty snapshot.
    fn read_run(&self, run_id: &RunId) -> RepositoryResult<Snapshot>;
    /// Raw rows of the selected runs, newest run first.
    fn list_products(&self, run_ids: &[RunId]) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over stored runs. Each call is one transaction.
pub trait SnapshotWriter {
    /// Stores `records` under a freshly assigned run identifier and returns it.
    fn append(&self, records: &[NewProduct]) -> RepositoryResult<RunId>;
    /// Deletes every row of the given runs and returns the number removed.
    fn delete_runs(&self, run_ids: &[RunId]) -> RepositoryResult<usize>;
    /// Keeps the `window` most recent runs and returns the number of rows removed.
    fn prune_to_latest(&self, window: RetentionWindow) -> RepositoryResult<usize>;
}

/// Read-only access to the comparison history.
pub trait ComparisonLogReader {
    /// Every logged comparison, most recent first.
    fn list_comparisons(&self) -> RepositoryResult<Vec<StoredComparison>>;
}

/// Append-only access to the comparison history.
pub trait ComparisonLogWriter {
    fn log_comparison(&self, comparison: &NewComparison) -> RepositoryResult<usize>;
}

pub trait ScheduleReader {
    fn get_schedule_config(&self) -> RepositoryResult<Option<ScheduleConfig>>;
}

pub trait ScheduleWriter {
    /// Replaces the single schedule row.
    fn update_schedule_config(&self, config: &ScheduleConfig) -> RepositoryResult<usize>;
}
