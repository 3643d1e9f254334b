// Start/sit entry point.
//
// Startup sequence:
// 1. Parse CLI flags
// 2. Initialize tracing (log to stderr; stdout carries the report)
// 3. Load config, creating missing files on first run
// 4. Load the week snapshot and score the roster
// 5. Write the report to stdout or --output

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use startsit::app::{self, RunOptions};
use startsit::config::{self, ModeSetting, OutputFormat};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Weekly fantasy football start/sit recommendations",
    long_about = None
)]
struct Cli {
    /// Directory holding config/ and defaults/ (default: working directory,
    /// then the platform config directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Week snapshot JSON (overrides data_paths.snapshot)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Long-format props CSV merged over the snapshot's props
    #[arg(long)]
    props_csv: Option<PathBuf>,

    /// Lineup mode (overrides pipeline.mode)
    #[arg(long, value_enum)]
    mode: Option<ModeSetting>,

    /// Report format (overrides output.format)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;

    let loaded =
        config::load_config(cli.base_dir.as_deref()).context("failed to load configuration")?;
    for path in &loaded.created {
        info!("created {}", path.display());
    }
    let config = loaded.config;
    info!("loaded config for league '{}'", config.league.name);

    let mut options = RunOptions::from_config(&config, &loaded.base_dir);
    if let Some(snapshot) = cli.snapshot {
        options.snapshot = snapshot;
    }
    if let Some(props_csv) = cli.props_csv {
        options.props_csv = Some(props_csv);
    }
    if let Some(mode) = cli.mode {
        options.mode = mode;
    }
    if let Some(format) = cli.format {
        options.format = format;
    }

    let report = app::run(&config, &options)?;

    match cli.output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            report
                .write(options.format, std::io::BufWriter::new(file))
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!("report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            report
                .write(options.format, &mut lock)
                .context("failed to write report to stdout")?;
            lock.flush().context("failed to flush stdout")?;
        }
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("startsit=info,startsit_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
