use chrono::Local;
use diesel::dsl::max;
use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product, Snapshot};
use crate::domain::types::{RetentionWindow, RunId};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, SnapshotReader, SnapshotWriter,
};

/// Rows per INSERT statement, keeping bound parameters well below SQLite's limit.
const INSERT_CHUNK_SIZE: usize = 150;

/// Primary key of the single `run_sequence` row.
const RUN_SEQUENCE_ID: i32 = 1;

impl SnapshotReader for DieselRepository {
    fn list_run_ids(&self) -> RepositoryResult<Vec<RunId>> {
        use crate::schema::product;

        let mut conn = self.conn()?;

        let run_ids = product::table
            .select(product::run_timestamp)
            .distinct()
            .order(product::run_timestamp.asc())
            .load::<String>(&mut conn)?;

        let run_ids = run_ids
            .into_iter()
            .map(RunId::new)
            .collect::<Result<Vec<RunId>, _>>()?;
        Ok(run_ids)
    }

    fn read_run(&self, run_id: &RunId) -> RepositoryResult<Snapshot> {
        use crate::schema::product;

        let mut conn = self.conn()?;

        // Insertion order, so later duplicates overwrite earlier ones.
        let rows = product::table
            .filter(product::run_timestamp.eq(run_id.as_str()))
            .order(product::id.asc())
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?;

        let products = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;
        Ok(Snapshot::from_products(products))
    }

    fn list_products(&self, run_ids: &[RunId]) -> RepositoryResult<Vec<Product>> {
        use crate::schema::product;

        if run_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;

        let ids = run_ids.iter().map(RunId::as_str).collect::<Vec<&str>>();
        let rows = product::table
            .filter(product::run_timestamp.eq_any(ids))
            .order((product::run_timestamp.desc(), product::id.asc()))
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?;

        let products = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;
        Ok(products)
    }
}

impl SnapshotWriter for DieselRepository {
    fn append(&self, records: &[NewProduct]) -> RepositoryResult<RunId> {
        use crate::schema::{product, run_sequence};

        let mut conn = self.conn()?;

        // BEGIN IMMEDIATE takes the write lock up front, so the id assignment
        // and the inserts cannot interleave with another writer.
        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let latest_stored = product::table
                .select(max(product::run_timestamp))
                .first::<Option<String>>(conn)?;
            // Covers runs that stored no rows or have since been deleted.
            let last_assigned = run_sequence::table
                .find(RUN_SEQUENCE_ID)
                .select(run_sequence::last_run_id)
                .first::<String>(conn)
                .optional()?;
            let latest = latest_stored
                .into_iter()
                .chain(last_assigned)
                .max()
                .map(RunId::new)
                .transpose()?;

            let run_id = RunId::next_after(Local::now().naive_local(), latest.as_ref())?;

            {
                let rows = records
                    .iter()
                    .map(|record| DbNewProduct::for_run(&run_id, record))
                    .collect::<Vec<DbNewProduct>>();

                for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                    diesel::insert_into(product::table)
                        .values(chunk)
                        .execute(conn)?;
                }
            }

            diesel::replace_into(run_sequence::table)
                .values((
                    run_sequence::id.eq(RUN_SEQUENCE_ID),
                    run_sequence::last_run_id.eq(run_id.as_str()),
                ))
                .execute(conn)?;

            Ok(run_id)
        })
    }

    fn delete_runs(&self, run_ids: &[RunId]) -> RepositoryResult<usize> {
        use crate::schema::product;

        if run_ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        let ids = run_ids.iter().map(RunId::as_str).collect::<Vec<&str>>();
        let affected = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let affected =
                diesel::delete(product::table.filter(product::run_timestamp.eq_any(ids)))
                    .execute(conn)?;
            Ok(affected)
        })?;

        Ok(affected)
    }

    fn prune_to_latest(&self, window: RetentionWindow) -> RepositoryResult<usize> {
        use crate::schema::product;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let stale = product::table
                .select(product::run_timestamp)
                .distinct()
                .order(product::run_timestamp.desc())
                .load::<String>(conn)?
                .into_iter()
                .skip(window.get())
                .collect::<Vec<String>>();

            if stale.is_empty() {
                return Ok(0);
            }

            let stale_runs = stale.len();
            let affected =
                diesel::delete(product::table.filter(product::run_timestamp.eq_any(stale)))
                    .execute(conn)?;

            log::debug!("Pruned {stale_runs} run(s), {affected} row(s), keeping {window}");
            Ok(affected)
        })
    }
}
