//! Homebrew installation, bootstrapping brew itself when missing.

use std::path::PathBuf;

use crate::context::ExecutionContext;
use crate::error::InstallError;
use crate::exec::{CommandSpec, run_checked};
use crate::fetch::FetchSpec;
use crate::product;
use crate::ui;

/// Standard install locations, Apple Silicon first. Checked after bootstrap
/// because a fresh brew is not on PATH yet.
const BREW_LOCATIONS: &[&str] = &["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

pub fn run(ctx: &ExecutionContext) -> Result<(), InstallError> {
    run_with(ctx, locate_brew)
}

fn run_with(
    ctx: &ExecutionContext,
    locate: impl Fn() -> Option<PathBuf>,
) -> Result<(), InstallError> {
    let brew = match locate() {
        Some(path) => path,
        None => {
            bootstrap(ctx)?;
            locate().ok_or_else(|| InstallError::BootstrapFailed {
                manager: "Homebrew",
                detail: "brew is still missing after its bootstrap script ran; \
                         manual installation required"
                    .into(),
            })?
        }
    };

    ui::info(format!("installing {} with brew", product::NAME));
    let install = CommandSpec::new(brew.display().to_string(), ["install", product::BREW_FORMULA]);
    run_checked(ctx.runner, &install)
        .map(drop)
        .map_err(|err| InstallError::PackageManagerFailed {
            tool: "brew",
            detail: err.to_string(),
        })
}

fn locate_brew() -> Option<PathBuf> {
    if let Ok(path) = which::which("brew") {
        return Some(path);
    }
    BREW_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Fetch and run the official bootstrap script non-interactively.
fn bootstrap(ctx: &ExecutionContext) -> Result<(), InstallError> {
    ui::info("Homebrew is missing, running its official bootstrap script");
    let spec = FetchSpec {
        url: product::BREW_BOOTSTRAP_URL.into(),
        dest: ctx.workspace.artifact_path("install-homebrew.sh"),
    };
    ctx.fetcher.fetch(&spec)?;

    let script = spec.dest.display().to_string();
    let run = CommandSpec::new("/bin/bash", [script.as_str()]).env("NONINTERACTIVE", "1");
    run_checked(ctx.runner, &run)
        .map(drop)
        .map_err(|err| InstallError::BootstrapFailed {
            manager: "Homebrew",
            detail: err.to_string(),
        })
}
