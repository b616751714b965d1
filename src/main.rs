use anyhow::Result;

use content_ratings::cli::Command;
use content_ratings::{handle_completions, handle_init, handle_recalculate, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init { reset } => handle_init(*reset),
        Command::Recalculate { target } => handle_recalculate(*target),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
