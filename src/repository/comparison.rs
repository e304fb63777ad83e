use diesel::prelude::*;

use crate::domain::comparison::{NewComparison, StoredComparison};
use crate::models::comparison::{Comparison as DbComparison, NewComparison as DbNewComparison};
use crate::repository::{
    ComparisonLogReader, ComparisonLogWriter, DieselRepository, RepositoryResult,
};

impl ComparisonLogReader for DieselRepository {
    fn list_comparisons(&self) -> RepositoryResult<Vec<StoredComparison>> {
        use crate::schema::comparison_log;

        let mut conn = self.conn()?;

        let rows = comparison_log::table
            .order((comparison_log::log_time.desc(), comparison_log::id.desc()))
            .select(DbComparison::as_select())
            .load::<DbComparison>(&mut conn)?;

        let rows = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<StoredComparison>, _>>()?;
        Ok(rows)
    }
}

impl ComparisonLogWriter for DieselRepository {
    fn log_comparison(&self, comparison: &NewComparison) -> RepositoryResult<usize> {
        use crate::schema::comparison_log;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(comparison_log::table)
            .values(DbNewComparison::from(comparison))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
