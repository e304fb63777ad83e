use crate::diff;
use crate::domain::comparison::RunDiff;
use crate::domain::types::RunId;
use crate::repository::SnapshotReader;

use super::{ServiceError, ServiceResult};

/// Default comparison selection: the two most recent runs, older first.
pub fn latest_pair<R>(repo: &R) -> ServiceResult<(RunId, RunId)>
where
    R: SnapshotReader,
{
    let run_ids = match repo.list_run_ids() {
        Ok(run_ids) => run_ids,
        Err(e) => {
            log::error!("Failed to list runs: {e}");
            return Err(e.into());
        }
    };

    match run_ids.as_slice() {
        [.., older, newer] => Ok((older.clone(), newer.clone())),
        _ => Err(ServiceError::Validation(
            "at least two runs are needed for a comparison".to_string(),
        )),
    }
}

/// Compares run `ts1` against the later run `ts2`.
///
/// Comparing a run with itself, or a later run against an earlier one, is
/// rejected before the diff engine runs. Unknown runs are `NotFound`.
pub fn compare_runs<R>(ts1: &str, ts2: &str, repo: &R) -> ServiceResult<RunDiff>
where
    R: SnapshotReader,
{
    let ts1 = RunId::new(ts1)?;
    let ts2 = RunId::new(ts2)?;

    if ts1 == ts2 {
        return Err(ServiceError::Validation(
            "select two different runs to compare".to_string(),
        ));
    }
    if ts1 > ts2 {
        return Err(ServiceError::Validation(format!(
            "first run {ts1} must be older than second run {ts2}"
        )));
    }

    let run_ids = match repo.list_run_ids() {
        Ok(run_ids) => run_ids,
        Err(e) => {
            log::error!("Failed to list runs: {e}");
            return Err(e.into());
        }
    };
    if !run_ids.contains(&ts1) || !run_ids.contains(&ts2) {
        return Err(ServiceError::NotFound);
    }

    let (run1, run2) = match (repo.read_run(&ts1), repo.read_run(&ts2)) {
        (Ok(run1), Ok(run2)) => (run1, run2),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to read runs for comparison: {e}");
            return Err(e.into());
        }
    };

    Ok(diff::compare(&run1, &run2))
}
