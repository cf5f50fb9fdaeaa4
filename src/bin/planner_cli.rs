//! Manual exerciser for [`arena_planner`]'s core. Reads a single request as
//! JSON on stdin and prints the matching response as pretty JSON on stdout.
//! This binary is scaffolding for poking the planner by hand — it is not a
//! host integration.

use std::io::{self, Read};
use std::process::ExitCode;

use arena_planner::api::{handle_plan_request, handle_recover_request, PlanRequest, RecoverRequest};
use arena_planner::Planner;
use clap::{Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(name = "planner-cli", about = "Exercise the arena planner core by hand")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a PlannerConfig TOML file; defaults to the bit-exact table.
    #[arg(long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Read a PlanRequest from stdin, print a PlanResponse.
    Plan,
    /// Read a RecoverRequest from stdin, print a RecoverResponse.
    Recover,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match arena_planner::PlannerConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{} {e}", "config error:".red().bold());
                return ExitCode::FAILURE;
            }
        },
        None => arena_planner::PlannerConfig::default(),
    };
    let planner = Planner::new(config);

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("{} {e}", "failed to read stdin:".red().bold());
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Plan => serde_json::from_str::<PlanRequest>(&input)
            .map_err(|e| e.to_string())
            .and_then(|req| handle_plan_request(&planner, req).map_err(|e| e.to_string()))
            .and_then(|resp| serde_json::to_string_pretty(&resp).map_err(|e| e.to_string())),
        Command::Recover => serde_json::from_str::<RecoverRequest>(&input)
            .map_err(|e| e.to_string())
            .and_then(|req| handle_recover_request(&planner, req).map_err(|e| e.to_string()))
            .and_then(|resp| serde_json::to_string_pretty(&resp).map_err(|e| e.to_string())),
    };

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("{} {msg}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
