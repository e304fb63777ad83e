use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::{DateTime, NaiveDateTime};
use diesel::prelude::*;
use shelf_watch::acquisition::CsvProductSource;
use shelf_watch::domain::comparison::{NewComparison, RunDiff};
use shelf_watch::domain::schedule::ScheduleConfig;
use shelf_watch::domain::types::{
    ProductName, RetentionWindow, RunId, ScheduleFrequency, ScheduleTimes,
};
use shelf_watch::repository::{
    ComparisonLogReader, ComparisonLogWriter, DieselRepository, ScheduleReader, ScheduleWriter,
    SnapshotReader, SnapshotWriter,
};
use shelf_watch::schema::{comparison_log, product, run_sequence};
use shelf_watch::services::job::{JobSettings, ScrapeJob};
use shelf_watch::services::report::show_comparison_log;
use tempfile::NamedTempFile;

mod common;

use common::new_product;

fn at(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .expect("valid timestamp")
        .naive_utc()
}

#[test]
fn append_assigns_strictly_increasing_run_ids() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let mut run_ids = Vec::new();
    for _ in 0..5 {
        run_ids.push(
            repo.append(&[new_product("Widget", "In stock", "$1", "/w")])
                .expect("should append run"),
        );
    }

    assert!(run_ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(repo.list_run_ids().expect("should list runs"), run_ids);
}

#[test]
fn empty_append_returns_an_id_but_stores_no_run() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let run_id = repo.append(&[]).expect("empty append should succeed");

    assert!(run_id.timestamp().is_some());
    assert!(repo.list_run_ids().expect("should list runs").is_empty());
    assert!(repo.read_run(&run_id).expect("should read run").is_empty());
}

#[test]
fn read_run_keeps_the_last_duplicate() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let run_id = repo
        .append(&[
            new_product("Widget", "In stock", "$1", "/w"),
            new_product("Gadget", "In stock", "$2", "/g"),
            new_product("Widget", "Sold out", "$3", "/w2"),
        ])
        .expect("should append run");

    let snapshot = repo.read_run(&run_id).expect("should read run");

    assert_eq!(snapshot.len(), 2);
    let widget = snapshot
        .get(&ProductName::new("Widget").unwrap())
        .expect("widget should be present");
    assert_eq!(widget.availability, "Sold out");
    assert_eq!(widget.price, "$3");
}

#[test]
fn unknown_run_reads_as_empty_snapshot() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let snapshot = repo
        .read_run(&RunId::new("2025-01-05T00:00:00.000000").unwrap())
        .expect("should read run");

    assert!(snapshot.is_empty());
}

#[test]
fn list_products_returns_newest_run_first() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .append(&[new_product("A", "", "", ""), new_product("B", "", "", "")])
        .expect("should append run");
    let second = repo
        .append(&[new_product("C", "", "", "")])
        .expect("should append run");

    let rows = repo
        .list_products(&[first.clone(), second.clone()])
        .expect("should list products");

    let order: Vec<(RunId, String)> = rows
        .into_iter()
        .map(|row| (row.run_id, row.name.as_str().to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            (second, "C".to_string()),
            (first.clone(), "A".to_string()),
            (first, "B".to_string()),
        ]
    );
}

#[test]
fn prune_keeps_the_ten_latest_runs() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let mut run_ids = Vec::new();
    for index in 0..12 {
        run_ids.push(
            repo.append(&[new_product(&format!("Item {index}"), "In stock", "$1", "")])
                .expect("should append run"),
        );
    }

    let removed = repo
        .prune_to_latest(RetentionWindow::DEFAULT)
        .expect("should prune");

    assert_eq!(removed, 2);
    assert_eq!(
        repo.list_run_ids().expect("should list runs"),
        run_ids[2..].to_vec()
    );

    let removed_again = repo
        .prune_to_latest(RetentionWindow::DEFAULT)
        .expect("should prune");
    assert_eq!(removed_again, 0);
    assert_eq!(repo.list_run_ids().expect("should list runs").len(), 10);
}

#[test]
fn delete_unknown_run_is_a_no_op() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let kept = repo
        .append(&[new_product("Widget", "In stock", "$1", "")])
        .expect("should append run");

    let deleted = repo
        .delete_runs(&[RunId::new("2025-01-05T00:00:00.000000").unwrap()])
        .expect("should delete");

    assert_eq!(deleted, 0);
    assert_eq!(repo.list_run_ids().expect("should list runs"), vec![kept]);
}

#[test]
fn delete_removes_every_row_of_selected_runs() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let first = repo
        .append(&[new_product("A", "", "", ""), new_product("B", "", "", "")])
        .expect("should append run");
    let second = repo
        .append(&[new_product("A", "", "", "")])
        .expect("should append run");
    let third = repo
        .append(&[new_product("A", "", "", "")])
        .expect("should append run");

    let deleted = repo
        .delete_runs(&[first, third])
        .expect("should delete");

    assert_eq!(deleted, 3);
    assert_eq!(repo.list_run_ids().expect("should list runs"), vec![second]);
}

#[test]
fn readers_never_observe_a_partial_run() {
    const ROWS: usize = 400;

    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let repo = repo.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::SeqCst) {
                let run_ids = repo.list_run_ids().expect("reader should list runs");
                for run_id in run_ids {
                    let snapshot = repo.read_run(&run_id).expect("reader should read run");
                    assert_eq!(snapshot.len(), ROWS, "run {run_id} observed partially");
                    let rows = repo
                        .list_products(std::slice::from_ref(&run_id))
                        .expect("reader should list products");
                    assert_eq!(rows.len(), ROWS, "run {run_id} observed partially");
                }
            }
        })
    };

    let records: Vec<_> = (0..ROWS)
        .map(|index| new_product(&format!("Item {index}"), "In stock", "$1", ""))
        .collect();
    for _ in 0..3 {
        repo.append(&records).expect("should append run");
    }

    done.store(true, Ordering::SeqCst);
    reader.join().expect("reader thread should not panic");
}

#[test]
fn comparison_log_lists_newest_first() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    for secs in [1_000, 3_000, 2_000] {
        let row = NewComparison::from_diff(None, None, &RunDiff::default(), at(secs))
            .expect("should encode comparison");
        repo.log_comparison(&row).expect("should log comparison");
    }

    let rows = repo.list_comparisons().expect("should list comparisons");

    let times: Vec<NaiveDateTime> = rows.iter().map(|row| row.log_time).collect();
    assert_eq!(times, vec![at(3_000), at(2_000), at(1_000)]);
    assert!(rows.iter().all(|row| row.ts1.is_none() && row.ts2.is_none()));
}

#[test]
fn corrupt_comparison_row_is_isolated() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let good = NewComparison::from_diff(None, None, &RunDiff::default(), at(1_000))
        .expect("should encode comparison");
    repo.log_comparison(&good).expect("should log comparison");

    let mut conn = test_db.pool().get().expect("should acquire connection");
    diesel::insert_into(comparison_log::table)
        .values((
            comparison_log::new_count.eq(1),
            comparison_log::new_items.eq("{broken"),
            comparison_log::log_time.eq(at(2_000)),
        ))
        .execute(&mut conn)
        .expect("should insert corrupt row");

    let rows = show_comparison_log(&repo).expect("history should load");

    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_err());
    assert!(rows[1].is_ok());
}

#[test]
fn blank_run_column_is_isolated_to_its_row() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let good = NewComparison::from_diff(None, None, &RunDiff::default(), at(1_000))
        .expect("should encode comparison");
    repo.log_comparison(&good).expect("should log comparison");

    let mut conn = test_db.pool().get().expect("should acquire connection");
    diesel::insert_into(comparison_log::table)
        .values((
            comparison_log::ts1.eq(""),
            comparison_log::log_time.eq(at(2_000)),
        ))
        .execute(&mut conn)
        .expect("should insert tampered row");

    let rows = show_comparison_log(&repo).expect("history should load");

    assert_eq!(rows.len(), 2);
    let err = rows[0].as_ref().expect_err("tampered row should not decode");
    assert_eq!(err.field, "ts1");
    assert!(rows[1].is_ok());
}

#[test]
fn run_ids_stay_ahead_of_every_assigned_id() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let empty = repo.append(&[]).expect("empty append should succeed");
    let after_empty = repo.append(&[]).expect("empty append should succeed");
    assert!(after_empty > empty);

    // An id ahead of the clock, as left behind when the clock steps back.
    let ahead = "2999-01-01T00:00:00.000000";
    let mut conn = test_db.pool().get().expect("should acquire connection");
    diesel::update(run_sequence::table)
        .set(run_sequence::last_run_id.eq(ahead))
        .execute(&mut conn)
        .expect("should move the sequence forward");

    let next = repo
        .append(&[new_product("Widget", "In stock", "$1", "")])
        .expect("should append run");

    assert!(next > RunId::new(ahead).unwrap());
    assert_eq!(repo.list_run_ids().expect("should list runs"), vec![next]);
}

#[test]
fn schedule_update_replaces_the_single_row() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    assert_eq!(repo.get_schedule_config().expect("should read schedule"), None);

    let daily = ScheduleConfig {
        frequency: ScheduleFrequency::Daily,
        days: String::new(),
        time_of_day: ScheduleTimes::parse("08:00,18:00").expect("valid times"),
    };
    let weekly = ScheduleConfig {
        frequency: ScheduleFrequency::Weekly,
        days: "mon,thu".to_string(),
        time_of_day: ScheduleTimes::parse("09:30").expect("valid times"),
    };
    repo.update_schedule_config(&daily)
        .expect("should store schedule");
    repo.update_schedule_config(&weekly)
        .expect("should replace schedule");

    assert_eq!(
        repo.get_schedule_config().expect("should read schedule"),
        Some(weekly)
    );

    let mut conn = test_db.pool().get().expect("should acquire connection");
    let rows: i64 = shelf_watch::schema::schedule_config::table
        .count()
        .get_result(&mut conn)
        .expect("should count schedule rows");
    assert_eq!(rows, 1);
}

fn write_export(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("should create export");
    writeln!(file, "name,availability,price,link").expect("should write header");
    for row in rows {
        writeln!(file, "{row}").expect("should write row");
    }
    file
}

#[test]
fn scrape_job_stores_prunes_and_logs() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let before = write_export(&["WidgetX,In stock,$10,/x"]);
    let after = write_export(&["WidgetX,Sold out,$10,/x", "WidgetY,In stock,$5,/y"]);

    let first = ScrapeJob::new(
        repo.clone(),
        CsvProductSource::new(before.path()),
        JobSettings::default(),
    )
    .run()
    .expect("first cycle should succeed");
    let second = ScrapeJob::new(
        repo.clone(),
        CsvProductSource::new(after.path()),
        JobSettings::default(),
    )
    .run()
    .expect("second cycle should succeed");

    assert_eq!(second.ts1, Some(first.run_id.clone()));
    assert_eq!(second.ts2, Some(second.run_id.clone()));

    let history = show_comparison_log(&repo).expect("history should load");
    assert_eq!(history.len(), 2);

    let latest = history[0].as_ref().expect("latest entry should decode");
    assert_eq!(latest.diff.new_count(), 1);
    assert_eq!(latest.diff.removed_count(), 0);
    let widget_x = latest
        .diff
        .updated_items
        .get(&ProductName::new("WidgetX").unwrap())
        .expect("WidgetX should be updated");
    assert_eq!(widget_x.availability.previous().as_str(), "In stock");
    assert_eq!(widget_x.availability.current().as_str(), "Sold out");
    assert!(!widget_x.price.is_changed());

    let first_entry = history[1].as_ref().expect("first entry should decode");
    assert_eq!(first_entry.ts1, first_entry.ts2);
    assert!(first_entry.diff.is_empty());
}

#[test]
fn failed_acquisition_leaves_the_store_untouched() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let result = ScrapeJob::new(
        repo.clone(),
        CsvProductSource::new("/nonexistent/products.csv"),
        JobSettings::default(),
    )
    .run();

    assert!(result.is_err());
    assert!(repo.list_run_ids().expect("should list runs").is_empty());

    let mut conn = test_db.pool().get().expect("should acquire connection");
    let logged: i64 = comparison_log::table
        .count()
        .get_result(&mut conn)
        .expect("should count comparisons");
    let stored: i64 = product::table
        .count()
        .get_result(&mut conn)
        .expect("should count products");
    assert_eq!((logged, stored), (0, 0));
}

#[test]
fn twelve_identical_products_compare_as_unchanged() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let records: Vec<_> = (0..12)
        .map(|index| new_product(&format!("Item {index}"), "In stock", "$9", "/i"))
        .collect();
    let first = repo.append(&records).expect("should append run");
    let second = repo.append(&records).expect("should append run");

    let diff = shelf_watch::diff::compare(
        &repo.read_run(&first).expect("should read run"),
        &repo.read_run(&second).expect("should read run"),
    );

    assert!(diff.is_empty());
    let encoded = serde_json::to_value(&diff).expect("should encode diff");
    assert_eq!(encoded["new_items"], serde_json::json!({}));
    assert_eq!(encoded["updated_items"], serde_json::json!({}));
}
