// gate.rs — Gate subcommands: preview.
//
// Settings are read from a TOML rendering of the execution request:
//
//   active_profiles = ["corp"]
//
//   [[profiles]]
//   id = "corp"
//
//   [[profiles.repositories]]
//   id = "corp-releases"
//   url = "https://repo.corp/releases"
//
//   [user_properties]
//   "focus.repo" = "corp-releases"

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use focus_core::{ExecutionRequest, FocusConfig};
use focus_gate::{GatedConfiguration, RepositoryGate};

#[derive(Subcommand)]
pub enum GateCommands {
    /// Show the profiles, repositories and mirror a build would run with.
    Preview {
        /// Settings file (TOML).
        #[arg(long)]
        settings: PathBuf,
        /// Focus repository id. Falls back to `focus.repo` in the settings'
        /// user properties, then to the focus config file.
        #[arg(long)]
        focus_repo: Option<String>,
    },
}

pub fn execute(cmd: &GateCommands, config: &FocusConfig) -> anyhow::Result<()> {
    match cmd {
        GateCommands::Preview {
            settings,
            focus_repo,
        } => {
            let request = load_settings(settings)?;
            let focus_id = focus_repo
                .clone()
                .or_else(|| FocusConfig::from_properties(&request.user_properties).focus_repo)
                .or_else(|| config.focus_repo.clone())
                .context("no focus repository given; pass --focus-repo")?;

            let gated = preview(&request, &focus_id)?;
            for line in gated.overview() {
                println!("{}", line);
            }
            println!();
            for mirror in &gated.mirrors {
                println!(
                    "Mirror {} of {} with target: {}",
                    mirror.id, mirror.mirror_of, mirror.url
                );
            }
        }
    }

    Ok(())
}

fn load_settings(path: &Path) -> anyhow::Result<ExecutionRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse settings {}", path.display()))
}

fn preview(request: &ExecutionRequest, focus_id: &str) -> anyhow::Result<GatedConfiguration> {
    tracing::info!("Previewing gate for focus repository {}", focus_id);
    Ok(RepositoryGate::new(focus_id).apply(&request.profiles, &request.active_profiles)?)
}
