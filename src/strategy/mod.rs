//! Strategy selection and dispatch.
//!
//! Exactly one strategy runs per invocation. Resolution is a pure function of
//! the host snapshot; it is never re-evaluated mid-run and strategies are
//! never each other's fallbacks.

pub mod deb;
pub mod homebrew;
pub mod nix;
pub mod rpm;
pub mod support;

use std::path::PathBuf;

use crate::chain::{Attempt, run_chain};
use crate::channel::InstallChannel;
use crate::context::ExecutionContext;
use crate::error::InstallError;
use crate::fetch::FetchSpec;
use crate::host::{HostProfile, Manager, OsFamily};
use crate::product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Homebrew,
    Deb,
    Rpm,
    NixUserProfile,
    NixSystemProfile,
    Unsupported,
}

impl Strategy {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Homebrew => "Homebrew",
            Self::Deb => "APT",
            Self::Rpm => "RPM",
            Self::NixUserProfile => "Nix (user profile)",
            Self::NixSystemProfile => "Nix (system profile)",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn execute(self, ctx: &ExecutionContext) -> Result<(), InstallError> {
        match self {
            Self::Homebrew => homebrew::run(ctx),
            Self::Deb => deb::run(ctx),
            Self::Rpm => rpm::run(ctx),
            Self::NixUserProfile => nix::run(ctx, false),
            Self::NixSystemProfile => nix::run(ctx, true),
            Self::Unsupported => Err(InstallError::UnsupportedPlatform),
        }
    }
}

/// Map the host snapshot to exactly one strategy; first match wins.
///
/// A present Nix installation preempts the native package managers, even on
/// macOS and Debian/RPM hosts that also carry one (see DESIGN.md). The
/// channel never affects the branch taken, only which artifacts are fetched.
pub fn resolve(host: &HostProfile, _channel: InstallChannel) -> Strategy {
    if host.os_family == OsFamily::NixOs || host.has_manager(Manager::Nix) {
        return if host.privileged {
            Strategy::NixSystemProfile
        } else {
            Strategy::NixUserProfile
        };
    }
    if host.os_family == OsFamily::DebianLike {
        return Strategy::Deb;
    }
    // A dnf/yum binary counts even when no release marker identified the family.
    if host.os_family == OsFamily::RpmLike || host.has_manager(Manager::DnfOrYum) {
        return Strategy::Rpm;
    }
    if host.os_family == OsFamily::MacOs {
        return Strategy::Homebrew;
    }
    Strategy::Unsupported
}

/// Fetch the product package into the workspace, trying the
/// architecture-specific artifact name before the generic fallback.
pub(crate) fn fetch_package_artifact(
    ctx: &ExecutionContext,
    extension: &str,
) -> Result<PathBuf, InstallError> {
    let candidates = [
        format!("{}_{}.{extension}", product::BIN, ctx.host.arch),
        format!("{}.{extension}", product::BIN),
    ];
    let attempts: Vec<Attempt<'_, PathBuf>> = candidates
        .into_iter()
        .map(|name| {
            let spec = FetchSpec {
                url: ctx.channel.artifact_url(&name),
                dest: ctx.workspace.artifact_path(&name),
            };
            Attempt::new(format!("fetch {name}"), move || {
                ctx.fetcher.fetch(&spec)?;
                Ok(spec.dest)
            })
        })
        .collect();

    run_chain(&format!("find a usable .{extension} package"), attempts)
        .map_err(|_| InstallError::NoUsablePackage { channel: ctx.channel })
}
