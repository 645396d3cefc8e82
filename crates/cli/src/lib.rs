pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::query::QueryAction;

#[derive(Debug, Parser)]
#[command(
    name = "shelfhook",
    about = "Shelfhook operator CLI",
    long_about = "Query the store catalog, inspect configuration, and check catalog reachability.",
    after_help = "Examples:\n  shelfhook demo --item Banana\n  shelfhook query cheapest Banana\n  shelfhook doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the catalog lookups against the bundled sample catalog")]
    Demo {
        #[arg(long, default_value = "Banana", help = "Item to look up")]
        item: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Answer a fulfillment intent against the configured catalog")]
    Query {
        #[command(subcommand)]
        intent: QueryCommand,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and catalog reachability; exits 1 when a check fails")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum QueryCommand {
    #[command(about = "List the distinct store names")]
    List,
    #[command(about = "List the stores that stock an item")]
    Find { item: String },
    #[command(about = "Find the store with the lowest price for an item")]
    Cheapest { item: String },
}

impl From<QueryCommand> for QueryAction {
    fn from(command: QueryCommand) -> Self {
        match command {
            QueryCommand::List => QueryAction::List,
            QueryCommand::Find { item } => QueryAction::Find { item },
            QueryCommand::Cheapest { item } => QueryAction::Cheapest { item },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Demo { item, json } => {
            commands::CommandResult { exit_code: 0, output: commands::demo::run(&item, json) }
        }
        Command::Query { intent } => commands::query::run(intent.into()),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
