pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod rating;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::{Command, Target};
use crate::config::settings::AppConfig;
use crate::services::recalculation::RecalculationService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init(reset: bool) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.storage.database_path)?;
    let conn = database::get_connection(&pool)?;
    if reset {
        database::setup::reset_database(&conn)
    } else {
        database::setup::init_database(&conn)
    }
}

pub fn handle_recalculate(target: Target) -> Result<()> {
    let config = AppConfig::new();
    let service = RecalculationService::new(config);
    let reports = service.run(&target.kinds())?;

    let failures: usize = reports.iter().map(|r| r.errors.len()).sum();
    if failures > 0 {
        log::warn!("{} records could not be recalculated", failures);
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
