use clap::{Parser, Subcommand};
use shelf_watch::db;
use shelf_watch::models::config::AppConfig;
use shelf_watch::repository::DieselRepository;

mod compare;
mod history;
mod run;
mod runs;
mod schedule;

#[derive(Debug, Parser)]
#[command(name = "shelf-watch", about = "Product listing change tracker", long_about = None)]
pub(crate) struct Cli {
    /// Configuration file, without extension
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Acquire the listing once, store it, prune and log the comparison
    Run(run::RunArgs),
    /// List stored runs
    Runs,
    /// Print the rows of one or more runs
    Show(runs::ShowArgs),
    /// Compare two runs, by default the two most recent
    Compare(compare::CompareArgs),
    /// Delete one or more runs
    Delete(runs::DeleteArgs),
    /// Print the comparison history
    Log(history::LogArgs),
    /// Show or change the scrape schedule
    Schedule(schedule::ScheduleCommand),
}

/// Resources shared by every command.
pub(crate) struct Context {
    pub config: AppConfig,
    pub repo: DieselRepository,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        let context = connect(self.config.as_deref())?;

        match self.command {
            Commands::Run(args) => run::run(args, &context),
            Commands::Runs => runs::list(&context),
            Commands::Show(args) => runs::show(args, &context),
            Commands::Compare(args) => compare::run(args, &context),
            Commands::Delete(args) => runs::delete(args, &context),
            Commands::Log(args) => history::run(args, &context),
            Commands::Schedule(command) => schedule::run(command, &context),
        }
    }
}

fn connect(config_path: Option<&str>) -> Result<Context, String> {
    let config = AppConfig::load(config_path)
        .map_err(|error| format!("failed to load configuration: {error}"))?;

    let pool = db::establish_connection_pool(&config.database_url)
        .map_err(|error| format!("failed to open database: {error}"))?;
    db::run_migrations(&pool).map_err(|error| format!("failed to prepare database: {error}"))?;

    Ok(Context {
        config,
        repo: DieselRepository::new(pool),
    })
}
