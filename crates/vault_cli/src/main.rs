//! Record vault CLI entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the store once.
//! - Compose the vault service with its listeners and run the menu.
//!
//! # Invariants
//! - Failing to open the store is fatal (non-zero exit).
//! - Logging failures are reported but never stop the shell.

use log::{error, info};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use vault_cli::Shell;
use vault_core::db::open_db;
use vault_core::{
    init_logging, LoggingListener, SnapshotWriter, SqliteRecordRepository, VaultConfig,
    VaultService,
};

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let config = match VaultConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Logging disabled: {err}");
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=startup module=cli status=error db_path={} error={}",
                config.db_path.display(),
                err
            );
            eprintln!("Failed to open vault store: {err}");
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteRecordRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("Failed to open vault store: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to vault store at {}", config.db_path.display());
    info!(
        "event=startup module=cli status=ok db_path={} backup_dir={} export_path={}",
        config.db_path.display(),
        config.backup_dir.display(),
        config.export_path.display()
    );

    let mut service = VaultService::new(
        repo,
        SnapshotWriter::new(&config.backup_dir),
        &config.export_path,
    );
    service.register_listener(Arc::new(LoggingListener));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(&service, stdin.lock(), stdout.lock());
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=shell_run module=cli status=error error={err}");
            eprintln!("Terminal error: {err}");
            ExitCode::FAILURE
        }
    }
}
