use clap::Args;
use shelf_watch::services::runs;

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Run identifiers as printed by `runs`
    #[arg(required = true)]
    run_ids: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct DeleteArgs {
    /// Run identifiers as printed by `runs`
    #[arg(required = true)]
    run_ids: Vec<String>,
}

pub(crate) fn list(context: &Context) -> Result<(), String> {
    let run_ids =
        runs::list_runs(&context.repo).map_err(|error| format!("failed to list runs: {error}"))?;

    if run_ids.is_empty() {
        println!("no runs stored");
    }
    for run_id in run_ids.iter().rev() {
        println!("{run_id}\t{}", run_id.label());
    }

    Ok(())
}

pub(crate) fn show(args: ShowArgs, context: &Context) -> Result<(), String> {
    let products = runs::show_runs(&args.run_ids, &context.repo)
        .map_err(|error| format!("failed to show runs: {error}"))?;

    println!("run\tname\tavailability\tprice\tlink");
    for product in products {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            product.run_id.label(),
            product.name,
            product.availability,
            product.price,
            product.link
        );
    }

    Ok(())
}

pub(crate) fn delete(args: DeleteArgs, context: &Context) -> Result<(), String> {
    let deleted = runs::delete_runs(&args.run_ids, &context.repo)
        .map_err(|error| format!("failed to delete runs: {error}"))?;

    println!("deleted_rows: {deleted}");

    Ok(())
}
