use clap::Args;
use shelf_watch::domain::comparison::RunDiff;
use shelf_watch::services::compare;

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct CompareArgs {
    /// Earlier run
    #[arg(requires = "ts2")]
    ts1: Option<String>,

    /// Later run
    ts2: Option<String>,

    /// Print the full diff as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(args: CompareArgs, context: &Context) -> Result<(), String> {
    let (ts1, ts2) = match (args.ts1, args.ts2) {
        (Some(ts1), Some(ts2)) => (ts1, ts2),
        _ => {
            let (ts1, ts2) = compare::latest_pair(&context.repo)
                .map_err(|error| format!("cannot compare: {error}"))?;
            (ts1.to_string(), ts2.to_string())
        }
    };

    let diff = compare::compare_runs(&ts1, &ts2, &context.repo)
        .map_err(|error| format!("cannot compare {ts1} and {ts2}: {error}"))?;

    if args.json {
        let json = serde_json::to_string_pretty(&diff)
            .map_err(|error| format!("failed to encode diff: {error}"))?;
        println!("{json}");
    } else {
        print_diff(&diff);
    }

    Ok(())
}

pub(crate) fn print_diff(diff: &RunDiff) {
    println!("new: {}", diff.new_count());
    for (name, attributes) in &diff.new_items {
        println!("  + {name}\t{}\t{}", attributes.availability, attributes.price);
    }
    println!("removed: {}", diff.removed_count());
    for (name, attributes) in &diff.removed_items {
        println!("  - {name}\t{}\t{}", attributes.availability, attributes.price);
    }
    println!("updated: {}", diff.updated_count());
    for (name, updated) in &diff.updated_items {
        println!(
            "  ~ {name}\t{} -> {}\t{} -> {}",
            updated.availability.previous(),
            updated.availability.current(),
            updated.price.previous(),
            updated.price.current()
        );
    }
}
