// Dugout entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log file unless --log-stderr)
// 3. Load config, load and evaluate players, run the subcommand

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use dugout_app::cli::{self, Cli};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_stderr)?;
    info!("dugout starting: {:?}", args.command);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::run(&args, &mut out) {
        error!("{:#}", e);
        return Err(e);
    }
    out.flush()?;
    Ok(())
}

/// Initialize tracing. Logs go to `logs/dugout.log` so command output on
/// stdout stays clean.
fn init_tracing(to_stderr: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dugout_app=info,dugout_baseball=info,warn"));

    if to_stderr {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .finish();
        return tracing::subscriber::set_global_default(subscriber)
            .context("failed to set tracing subscriber");
    }

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("dugout.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
