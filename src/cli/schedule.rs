use clap::{Args, Subcommand};
use shelf_watch::forms::schedule::ScheduleForm;
use shelf_watch::services::schedule;

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct ScheduleCommand {
    #[command(subcommand)]
    command: ScheduleSubcommand,
}

#[derive(Debug, Subcommand)]
enum ScheduleSubcommand {
    /// Print the stored schedule
    Show,
    /// Replace the stored schedule
    Set(SetScheduleArgs),
}

#[derive(Debug, Args)]
struct SetScheduleArgs {
    /// daily, weekly or monthly
    #[arg(long)]
    frequency: String,

    /// Days for weekly schedules, e.g. `mon,wed,fri`
    #[arg(long, default_value = "")]
    days: String,

    /// Comma-separated HH:MM times; only daily schedules take several
    #[arg(long)]
    times: String,
}

pub(crate) fn run(command: ScheduleCommand, context: &Context) -> Result<(), String> {
    match command.command {
        ScheduleSubcommand::Show => show(context),
        ScheduleSubcommand::Set(args) => set(args, context),
    }
}

fn show(context: &Context) -> Result<(), String> {
    let config = schedule::show_schedule(&context.repo)
        .map_err(|error| format!("failed to load schedule: {error}"))?;

    match config {
        Some(config) => {
            println!("frequency: {}", config.frequency);
            if !config.days.is_empty() {
                println!("days: {}", config.days);
            }
            println!("times: {}", config.time_of_day);
        }
        None => println!("no schedule set"),
    }

    Ok(())
}

fn set(args: SetScheduleArgs, context: &Context) -> Result<(), String> {
    let form = ScheduleForm {
        frequency: args.frequency,
        days: args.days,
        times: args.times,
    };

    let config = schedule::update_schedule(form, &context.repo)
        .map_err(|error| format!("failed to update schedule: {error}"))?;

    println!("frequency: {}", config.frequency);
    println!("times: {}", config.time_of_day);

    Ok(())
}
