//! Declarative (Nix) installation paths.
//!
//! System-profile runs try to get the product's binary cache trusted first:
//! NixOS configuration is never mutated automatically, generic hosts get the
//! settings appended to nix.conf with a backup. Everything about cache trust
//! is advisory; only the profile install itself can be fatal.

use std::fs;
use std::path::Path;

use nix::unistd::{AccessFlags, access};

use crate::channel::InstallChannel;
use crate::context::ExecutionContext;
use crate::error::InstallError;
use crate::exec::{CommandSpec, run_checked};
use crate::host::OsFamily;
use crate::product;
use crate::ui;

const NIX_CONF_PATH: &str = "/etc/nix/nix.conf";
const SYSTEM_PROFILE: &str = "/nix/var/nix/profiles/default";

pub fn run(ctx: &ExecutionContext, system_profile: bool) -> Result<(), InstallError> {
    if system_profile {
        prepare_cache_trust(ctx);
    }
    install_profile(ctx, system_profile)
}

fn prepare_cache_trust(ctx: &ExecutionContext) {
    let conf = Path::new(NIX_CONF_PATH);
    let content = fs::read_to_string(conf).unwrap_or_default();
    if conf_trusts_cache(&content) {
        return;
    }

    if ctx.host.os_family == OsFamily::NixOs {
        advise_nixos_configuration();
        return;
    }

    if !can_write(conf) {
        ui::warn(format!(
            "{NIX_CONF_PATH} is not writable; add the {} binary cache there manually",
            product::NAME
        ));
        return;
    }
    if let Err(err) = append_cache_trust(conf, &content) {
        ui::warn(format!("could not update {NIX_CONF_PATH}: {err}"));
        return;
    }
    ui::info(format!(
        "added the {} binary cache to {NIX_CONF_PATH} (previous file backed up)",
        product::NAME
    ));
    restart_daemon_if_active(ctx);
}

fn conf_trusts_cache(content: &str) -> bool {
    content.contains(product::NIX_CACHE_URL)
}

fn can_write(conf: &Path) -> bool {
    let probe = if conf.exists() {
        conf
    } else {
        conf.parent().unwrap_or(Path::new("/"))
    };
    access(probe, AccessFlags::W_OK).is_ok()
}

fn trust_settings() -> String {
    format!(
        "\n# added by the {} installer\nextra-substituters = {}\nextra-trusted-public-keys = {}\n",
        product::NAME,
        product::NIX_CACHE_URL,
        product::NIX_CACHE_KEY
    )
}

fn append_cache_trust(conf: &Path, current: &str) -> std::io::Result<()> {
    if conf.exists() {
        fs::copy(conf, conf.with_extension("conf.before-lodestone"))?;
    } else if let Some(parent) = conf.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut updated = current.to_string();
    updated.push_str(&trust_settings());
    fs::write(conf, updated)
}

/// NixOS manages nix.conf declaratively; tell the administrator what to add
/// instead of editing a generated file.
fn advise_nixos_configuration() {
    ui::warn(format!(
        "this NixOS system does not trust the {} binary cache yet",
        product::NAME
    ));
    println!("add this to your configuration and rebuild:");
    println!(
        "  nix.settings.substituters = [ \"{}\" ];",
        product::NIX_CACHE_URL
    );
    println!(
        "  nix.settings.trusted-public-keys = [ \"{}\" ];",
        product::NIX_CACHE_KEY
    );
    println!("continuing without the cache; installs may build from source");
}

fn restart_daemon_if_active(ctx: &ExecutionContext) {
    let probe = CommandSpec::new("systemctl", ["is-active", "--quiet", "nix-daemon"]).quiet();
    if !ctx.runner.run(&probe).success {
        return;
    }
    let restart = CommandSpec::new("systemctl", ["try-restart", "nix-daemon"])
        .as_root()
        .quiet();
    if !ctx.runner.run(&restart).success {
        ui::warn("nix-daemon restart failed; new cache settings apply after its next restart");
    }
}

fn install_profile(ctx: &ExecutionContext, system_profile: bool) -> Result<(), InstallError> {
    let installable = match ctx.channel {
        InstallChannel::Stable => product::FLAKE_STABLE,
        InstallChannel::Nightly => product::FLAKE_NIGHTLY,
    };

    let mut args = vec![
        "--extra-experimental-features",
        "nix-command flakes",
        "profile",
        "install",
    ];
    if system_profile {
        args.extend(["--profile", SYSTEM_PROFILE]);
    }
    args.push(installable);

    let mut spec = CommandSpec::new("nix", args);
    if system_profile {
        spec = spec.as_root();
    }
    run_checked(ctx.runner, &spec)
        .map(drop)
        .map_err(|err| InstallError::ProfileInstallFailed {
            detail: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::super::testing::{MockFetcher, ScriptedRunner, host};
    use super::*;
    use crate::workspace::ScratchWorkspace;

    #[test]
    fn trust_detection_matches_on_the_cache_url() {
        assert!(!conf_trusts_cache(""));
        assert!(!conf_trusts_cache("substituters = https://cache.nixos.org\n"));
        let trusted = format!("extra-substituters = {}\n", product::NIX_CACHE_URL);
        assert!(conf_trusts_cache(&trusted));
    }

    #[test]
    fn append_preserves_existing_settings_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("nix.conf");
        fs::write(&conf, "max-jobs = 4\n").unwrap();

        append_cache_trust(&conf, "max-jobs = 4\n").unwrap();

        let updated = fs::read_to_string(&conf).unwrap();
        assert!(updated.starts_with("max-jobs = 4\n"));
        assert!(updated.contains(product::NIX_CACHE_URL));
        assert!(updated.contains(product::NIX_CACHE_KEY));

        let backup = conf.with_extension("conf.before-lodestone");
        assert_eq!(fs::read_to_string(backup).unwrap(), "max-jobs = 4\n");
    }

    #[test]
    fn append_creates_the_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("etc/nix/nix.conf");

        append_cache_trust(&conf, "").unwrap();

        let updated = fs::read_to_string(&conf).unwrap();
        assert!(updated.contains("extra-substituters"));
        assert!(!conf.with_extension("conf.before-lodestone").exists());
    }

    #[test]
    fn user_profile_install_stays_in_userland() {
        let workspace = ScratchWorkspace::create().unwrap();
        let profile = host(OsFamily::DebianLike, false);
        let fetcher = MockFetcher::allowing(|_url: &str| true);
        let runner = ScriptedRunner::new(|_spec: &CommandSpec| true);
        let ctx = ExecutionContext {
            host: &profile,
            channel: InstallChannel::Stable,
            workspace: &workspace,
            fetcher: &fetcher,
            runner: &runner,
        };

        run(&ctx, false).unwrap();

        let log = runner.call_log();
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("nix "));
        assert!(log[0].contains("profile install"));
        assert!(!log[0].contains("--profile /nix/var"));
        assert!(log[0].ends_with(product::FLAKE_STABLE));
    }

    #[test]
    fn system_profile_on_nixos_advises_and_installs() {
        let workspace = ScratchWorkspace::create().unwrap();
        // NixOS branch: configuration is advised about, never written.
        let profile = host(OsFamily::NixOs, true);
        let fetcher = MockFetcher::allowing(|_url: &str| true);
        let runner = ScriptedRunner::new(|_spec: &CommandSpec| true);
        let ctx = ExecutionContext {
            host: &profile,
            channel: InstallChannel::Nightly,
            workspace: &workspace,
            fetcher: &fetcher,
            runner: &runner,
        };

        run(&ctx, true).unwrap();

        let log = runner.call_log();
        assert_eq!(log.len(), 1);
        assert!(log[0].contains("--profile /nix/var/nix/profiles/default"));
        assert!(log[0].ends_with(product::FLAKE_NIGHTLY));
    }

    #[test]
    fn failed_profile_install_is_fatal() {
        let workspace = ScratchWorkspace::create().unwrap();
        let profile = host(OsFamily::DebianLike, false);
        let fetcher = MockFetcher::allowing(|_url: &str| true);
        let runner = ScriptedRunner::new(|_spec: &CommandSpec| false);
        let ctx = ExecutionContext {
            host: &profile,
            channel: InstallChannel::Stable,
            workspace: &workspace,
            fetcher: &fetcher,
            runner: &runner,
        };

        let err = run(&ctx, false).unwrap_err();
        assert!(matches!(err, InstallError::ProfileInstallFailed { .. }));
    }
}
