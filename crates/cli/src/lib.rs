pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "toolfinder",
    about = "Toolfinder operator CLI",
    long_about = "Find AI tools for a task from the configured language-model providers, falling back to the built-in catalog.",
    after_help = "Examples:\n  toolfinder recommend convert csv to pdf\n  toolfinder recommend --ai --json make a logo\n  toolfinder interactive\n  toolfinder config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend tools for a single query")]
    Recommend {
        #[arg(required = true, num_args = 1.., help = "Task description, e.g. `convert csv to pdf`")]
        query: Vec<String>,
        #[arg(long, help = "Use the hosted model gateway before the provider chain")]
        ai: bool,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Prompt for queries until `quit`, `exit`, or `q`")]
    Interactive,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { query, ai, json } => {
            commands::recommend::run(&query.join(" "), ai, json)
        }
        Command::Interactive => commands::interactive::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
