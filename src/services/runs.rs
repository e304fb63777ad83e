use crate::domain::product::Product;
use crate::domain::types::RunId;
use crate::repository::{SnapshotReader, SnapshotWriter};

use super::{ServiceError, ServiceResult};

/// Parses operator-supplied run identifiers, rejecting an empty selection.
pub(crate) fn parse_selection(run_ids: &[String]) -> ServiceResult<Vec<RunId>> {
    if run_ids.is_empty() {
        return Err(ServiceError::Validation(
            "select at least one run".to_string(),
        ));
    }
    let parsed = run_ids
        .iter()
        .map(|id| RunId::new(id.as_str()))
        .collect::<Result<Vec<RunId>, _>>()?;
    Ok(parsed)
}

/// Lists every stored run, oldest first.
pub fn list_runs<R>(repo: &R) -> ServiceResult<Vec<RunId>>
where
    R: SnapshotReader,
{
    match repo.list_run_ids() {
        Ok(run_ids) => Ok(run_ids),
        Err(e) => {
            log::error!("Failed to list runs: {e}");
            Err(e.into())
        }
    }
}

/// Returns the stored rows of the selected runs, newest run first.
pub fn show_runs<R>(run_ids: &[String], repo: &R) -> ServiceResult<Vec<Product>>
where
    R: SnapshotReader,
{
    let run_ids = parse_selection(run_ids)?;

    match repo.list_products(&run_ids) {
        Ok(products) => Ok(products),
        Err(e) => {
            log::error!("Failed to load products for runs: {e}");
            Err(e.into())
        }
    }
}

/// Deletes the selected runs and returns the number of rows removed.
///
/// Runs that do not exist contribute nothing.
pub fn delete_runs<R>(run_ids: &[String], repo: &R) -> ServiceResult<usize>
where
    R: SnapshotWriter,
{
    let run_ids = parse_selection(run_ids)?;

    match repo.delete_runs(&run_ids) {
        Ok(deleted) => {
            log::info!("Deleted {deleted} row(s) from {} run(s)", run_ids.len());
            Ok(deleted)
        }
        Err(e) => {
            log::error!("Failed to delete runs: {e}");
            Err(e.into())
        }
    }
}
