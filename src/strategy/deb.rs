//! Debian/APT family installation.
//!
//! Key import is tolerant (nightly artifacts may not be signed yet), artifact
//! naming falls back from architecture-specific to generic, and the install
//! itself escalates through three tiers before giving up.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::chain::{Attempt, run_chain};
use crate::context::ExecutionContext;
use crate::error::InstallError;
use crate::exec::{CommandSpec, run_checked};
use crate::fetch::FetchSpec;
use crate::product;
use crate::ui;

const KEYRING_DIR: &str = "/usr/share/keyrings";

pub fn run(ctx: &ExecutionContext) -> Result<(), InstallError> {
    import_signing_key(ctx);
    let package = super::fetch_package_artifact(ctx, "deb")?;
    make_apt_readable(ctx.workspace.path(), &package);
    install_package(ctx, &package)
}

/// Soft step: a missing key is a warning, never a stop.
fn import_signing_key(ctx: &ExecutionContext) {
    let spec = FetchSpec {
        url: ctx.channel.artifact_url(product::DEB_KEYRING),
        dest: ctx.workspace.artifact_path(product::DEB_KEYRING),
    };
    if let Err(err) = ctx.fetcher.fetch(&spec) {
        ui::warn(format!("signing key unavailable, continuing unsigned: {err}"));
        return;
    }

    let source = spec.dest.display().to_string();
    let target = format!("{KEYRING_DIR}/{}", product::DEB_KEYRING);
    let place = CommandSpec::new(
        "install",
        ["-D", "-m", "0644", source.as_str(), target.as_str()],
    )
    .as_root()
    .quiet();
    if !ctx.runner.run(&place).success {
        ui::warn("could not place the signing key in the system keyring");
    }
}

/// apt runs its internal fetcher as the unprivileged `_apt` user, which must
/// be able to read the artifact and traverse its directory.
fn make_apt_readable(workspace: &Path, package: &Path) {
    for (path, mode) in [(workspace, 0o755), (package, 0o644)] {
        if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
            ui::warn(format!(
                "could not relax permissions on {}: {err}",
                path.display()
            ));
        }
    }
}

/// Three-tier escalation: quiet install, the same install surfaced verbosely
/// for diagnosis, then dpkg directly with a dependency-repair pass. Only the
/// repair pass failing is fatal.
fn install_package(ctx: &ExecutionContext, package: &Path) -> Result<(), InstallError> {
    let package_arg = package.display().to_string();

    let quiet = CommandSpec::new("apt-get", ["install", "-y", "-qq", package_arg.as_str()])
        .as_root()
        .quiet()
        .env("DEBIAN_FRONTEND", "noninteractive");
    let verbose = CommandSpec::new("apt-get", ["install", "-y", package_arg.as_str()])
        .as_root()
        .env("DEBIAN_FRONTEND", "noninteractive");
    let dpkg = CommandSpec::new("dpkg", ["-i", package_arg.as_str()]).as_root();
    let repair = CommandSpec::new("apt-get", ["install", "-f", "-y"])
        .as_root()
        .env("DEBIAN_FRONTEND", "noninteractive");

    let attempts = vec![
        Attempt::new("quiet apt-get install", || {
            run_checked(ctx.runner, &quiet).map(drop)
        }),
        Attempt::new("verbose apt-get install", || {
            run_checked(ctx.runner, &verbose).map(drop)
        }),
        Attempt::new("dpkg install with dependency repair", || {
            // dpkg may leave dependencies unconfigured; the repair pass decides.
            let _ = ctx.runner.run(&dpkg);
            run_checked(ctx.runner, &repair).map(drop)
        }),
    ];

    run_chain("install the package", attempts).map_err(|err| {
        InstallError::PackageManagerFailed {
            tool: "apt-get",
            detail: err.to_string(),
        }
    })
}
