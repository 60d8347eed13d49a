mod cli;
use cli::{CliMode, USAGE, parse_cli_mode, run_agenda_mode};
mod tui;
use tui::run_tui;

use groomdesk::storage::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let cli_mode = match parse_cli_mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let result = match cli_mode {
        CliMode::Agenda { date, view, sample } => run_agenda_mode(date, view, sample).await,
        CliMode::Default { sample, view } => run_tui(sample, view).await,
    };

    if let Err(e) = &result {
        tracing::error!("groomdesk exited with error: {:#}", e);
    }
    result
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "groomdesk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("groomdesk started");
}
