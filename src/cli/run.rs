use clap::Args;
use shelf_watch::acquisition::CsvProductSource;
use shelf_watch::services::job::{JobSettings, ScrapeJob};

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    /// CSV product export; defaults to `source_path` from the configuration
    #[arg(long)]
    source: Option<String>,
}

pub(crate) fn run(args: RunArgs, context: &Context) -> Result<(), String> {
    let retention = context
        .config
        .retention_window()
        .map_err(|error| format!("invalid retention: {error}"))?;
    let settings = JobSettings {
        retention,
        log_degenerate_comparisons: context.config.log_degenerate_comparisons,
    };

    let path = args.source.unwrap_or_else(|| context.config.source_path.clone());
    let job = ScrapeJob::new(context.repo.clone(), CsvProductSource::new(path), settings);

    let report = job
        .run()
        .map_err(|error| format!("scrape failed: {error}"))?;

    println!("run_id: {}", report.run_id);
    println!("products: {}", report.product_count);
    println!("pruned_rows: {}", report.pruned_rows);
    println!(
        "compared: {} -> {}",
        report.ts1.as_ref().map(|id| id.label()).unwrap_or_default(),
        report.ts2.as_ref().map(|id| id.label()).unwrap_or_default()
    );
    println!("new: {}", report.diff.new_count());
    println!("removed: {}", report.diff.removed_count());
    println!("updated: {}", report.diff.updated_count());
    if !report.logged {
        println!("comparison not logged");
    }

    Ok(())
}
