// access_log.rs — Access log subcommands: summary.

use std::path::PathBuf;

use clap::Subcommand;
use focus_accesslog::AccessLog;

#[derive(Subcommand)]
pub enum AccessLogCommands {
    /// Lookup counts per coordinate, most requested first.
    Summary {
        /// Path to the log (usually <local repo>/artifact-request.log).
        file: PathBuf,
        /// Number of coordinates to show.
        #[arg(short, default_value = "20")]
        n: usize,
    },
}

pub fn execute(cmd: &AccessLogCommands) -> anyhow::Result<()> {
    match cmd {
        AccessLogCommands::Summary { file, n } => {
            if !file.exists() {
                println!("No access log found at {}", file.display());
                return Ok(());
            }

            let log = AccessLog::new(file);
            let total = log.entries()?.len();
            let summary = log.summary()?;
            if summary.is_empty() {
                println!("No lookups recorded.");
                return Ok(());
            }

            println!("{:>8}  COORDINATE", "LOOKUPS");
            println!("{}", "-".repeat(60));
            for count in summary.iter().take(*n) {
                println!("{:>8}  {}", count.count, count.key);
            }
            println!();
            println!(
                "{} lookup(s) of {} distinct coordinate(s)",
                total,
                summary.len()
            );
        }
    }

    Ok(())
}
