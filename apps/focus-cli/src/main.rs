//! # focus-cli
//!
//! Command-line companion for Repo Focus. Offline only: it reads files a
//! focused build left behind and never contacts a repository.
//!
//! - `focus bill show/verify` — inspect a bill (`recording.txt`)
//! - `focus access-log summary` — aggregate `artifact-request.log`
//! - `focus gate preview` — what a settings file looks like once gated

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use focus_core::FocusConfig;
use tracing_subscriber::EnvFilter;

/// Repo Focus CLI — inspect bills, access logs and gated settings.
#[derive(Parser)]
#[command(name = "focus", version, about)]
struct Cli {
    /// Focus config file (TOML). Missing or unreadable means defaults.
    #[arg(long, default_value = "focus.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines instead of plain text.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a bill of recorded artifacts.
    Bill {
        #[command(subcommand)]
        command: commands::bill::BillCommands,
    },
    /// Inspect a local repository access log.
    AccessLog {
        #[command(subcommand)]
        command: commands::access_log::AccessLogCommands,
    },
    /// Preview the repository gate against a settings file.
    Gate {
        #[command(subcommand)]
        command: commands::gate::GateCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    let config = FocusConfig::load_or_default(&cli.config);

    match &cli.command {
        Commands::Bill { command } => commands::bill::execute(command),
        Commands::AccessLog { command } => commands::access_log::execute(command),
        Commands::Gate { command } => commands::gate::execute(command, &config),
    }
}

/// Logs go to stderr so they never mix with command output on stdout.
fn init_logging(json: bool) -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for target in [
        "focus_cli",
        "focus_core",
        "focus_gate",
        "focus_bill",
        "focus_accesslog",
    ] {
        filter = filter.add_directive(format!("{target}=info").parse()?);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
