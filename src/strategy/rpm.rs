//! RPM family installation: optional key import, artifact-name fallback,
//! then a single direct rpm invocation. No escalation tiers here.

use crate::context::ExecutionContext;
use crate::error::InstallError;
use crate::exec::{CommandSpec, run_checked};
use crate::fetch::FetchSpec;
use crate::product;
use crate::ui;

pub fn run(ctx: &ExecutionContext) -> Result<(), InstallError> {
    import_signing_key(ctx);
    let package = super::fetch_package_artifact(ctx, "rpm")?;

    let package_arg = package.display().to_string();
    let install =
        CommandSpec::new("rpm", ["-U", "--replacepkgs", package_arg.as_str()]).as_root();
    run_checked(ctx.runner, &install)
        .map(drop)
        .map_err(|err| InstallError::PackageManagerFailed {
            tool: "rpm",
            detail: err.to_string(),
        })
}

/// Soft step, same rationale as the Debian path.
fn import_signing_key(ctx: &ExecutionContext) {
    let spec = FetchSpec {
        url: ctx.channel.artifact_url(product::RPM_KEY),
        dest: ctx.workspace.artifact_path(product::RPM_KEY),
    };
    if let Err(err) = ctx.fetcher.fetch(&spec) {
        ui::warn(format!("signing key unavailable, continuing unsigned: {err}"));
        return;
    }

    let key_arg = spec.dest.display().to_string();
    let import = CommandSpec::new("rpm", ["--import", key_arg.as_str()])
        .as_root()
        .quiet();
    if !ctx.runner.run(&import).success {
        ui::warn("rpm rejected the signing key; the package may install unverified");
    }
}
