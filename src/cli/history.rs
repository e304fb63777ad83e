use std::fs;

use clap::Args;
use shelf_watch::domain::types::DISPLAY_FORMAT;
use shelf_watch::services::report;

use super::Context;
use super::compare::print_diff;

#[derive(Debug, Args)]
pub(crate) struct LogArgs {
    /// Write the history to this CSV file instead of printing it
    #[arg(long)]
    csv: Option<String>,
}

pub(crate) fn run(args: LogArgs, context: &Context) -> Result<(), String> {
    if let Some(path) = args.csv {
        let bytes = report::export_comparison_log_csv(&context.repo)
            .map_err(|error| format!("failed to export comparison log: {error}"))?;
        fs::write(&path, bytes).map_err(|error| format!("failed to write {path}: {error}"))?;
        println!("written: {path}");
        return Ok(());
    }

    let rows = report::show_comparison_log(&context.repo)
        .map_err(|error| format!("failed to load comparison log: {error}"))?;

    if rows.is_empty() {
        println!("no comparisons logged");
    }
    for row in rows {
        match row {
            Ok(record) => {
                println!(
                    "[{}] {} -> {}",
                    record.log_time.format(DISPLAY_FORMAT),
                    record.ts1.as_ref().map(|id| id.label()).unwrap_or_default(),
                    record.ts2.as_ref().map(|id| id.label()).unwrap_or_default()
                );
                print_diff(&record.diff);
            }
            Err(error) => println!("unreadable entry: {error}"),
        }
    }

    Ok(())
}
