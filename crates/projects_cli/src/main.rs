//! Interactive projects planner.
//!
//! # Responsibility
//! - Wire configuration, logging and the project store together.
//! - Hand stdin/stdout to the menu loop.
//!
//! Environment: `PROJECTS_DB_PATH`, `PROJECTS_DB_BUSY_TIMEOUT_MS`,
//! `PROJECTS_LOG_LEVEL`, `PROJECTS_LOG_DIR`. Pass `--init-schema` to create
//! missing tables before starting.

mod input;
mod menu;

use log::{error, info};
use menu::ProjectsMenu;
use projects_core::db::schema::ensure_schema;
use projects_core::{
    core_version, init_logging, ConnectionSource, DbConfig, LogConfig, ProjectService,
    SqliteProjectRepository,
};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let init_schema = std::env::args().skip(1).any(|arg| arg == "--init-schema");

    match LogConfig::from_env() {
        Ok(Some(log_config)) => {
            if let Err(err) = init_logging(&log_config) {
                eprintln!("logging disabled: {err}");
            }
        }
        Ok(None) => {}
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let config = DbConfig::from_env();
    info!("event=cli_start module=cli status=start version={}", core_version());

    if init_schema {
        let result = config
            .acquire()
            .and_then(|mut conn| ensure_schema(&mut conn));
        if let Err(err) = result {
            error!("event=cli_start module=cli status=error error_code=schema_init_failed");
            eprintln!("Unable to create schema: {err}");
            return ExitCode::FAILURE;
        }
    }

    let repo = match SqliteProjectRepository::try_new(config) {
        Ok(repo) => repo,
        Err(err) => {
            error!("event=cli_start module=cli status=error error_code=store_unavailable");
            eprintln!("Unable to open project store: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to project store (core {}).", core_version());

    let stdin = io::stdin();
    let mut menu = ProjectsMenu::new(ProjectService::new(repo), stdin.lock(), io::stdout());
    match menu.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
