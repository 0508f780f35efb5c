//! CLI entry point: prints the dashboard payload for today as JSON.
//!
//! Exit code 1 when configuration, the store, or serialization fails.

use freelancehub_core::db::open_db;
use freelancehub_core::{
    core_version, init_logging, CoreConfig, DashboardOutcome, DashboardService,
    SqlitePaymentRepository, SqliteProjectRepository,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("freelancehub: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("freelancehub: {err}");
            return ExitCode::FAILURE;
        }
    }
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!(
                "freelancehub: data unavailable: cannot open `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let service = DashboardService::new(
        SqliteProjectRepository::new(&conn),
        SqlitePaymentRepository::new(&conn),
    )
    .with_bucketing(config.bucketing);

    match service.build_dashboard() {
        DashboardOutcome::Ready(report) => {
            for issue in &report.data_issues {
                eprintln!("freelancehub: skipped {issue}");
            }
            match serde_json::to_string_pretty(&report.payload) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("freelancehub: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        DashboardOutcome::Unavailable { source, reason } => {
            eprintln!("freelancehub: data unavailable ({source}): {reason}");
            ExitCode::FAILURE
        }
    }
}
