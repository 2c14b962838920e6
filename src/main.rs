mod chain;
mod channel;
mod context;
mod error;
mod exec;
mod fetch;
mod host;
mod product;
mod strategy;
mod ui;
mod verify;
mod workspace;

use clap::Parser;

use channel::InstallChannel;
use context::ExecutionContext;
use error::InstallError;
use exec::SystemRunner;
use fetch::TransportFetcher;
use host::HostProfile;
use strategy::Strategy;
use verify::{InstallReport, Outcome};
use workspace::ScratchWorkspace;

/// Bootstrap installer for the Lodestone CLI.
#[derive(Parser, Debug)]
#[command(
    name = "lodestone-install",
    version,
    about = "Installs the Lodestone CLI through the host's native package manager"
)]
struct Cli {
    /// Install the nightly channel instead of stable
    #[arg(long)]
    nightly: bool,

    /// Unrecognized arguments end up here; reported, never fatal.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    rest: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    let (nightly_in_rest, ignored) = sift_extra_args(&cli.rest);
    if !ignored.is_empty() {
        ui::warn(format!(
            "ignoring unrecognized arguments: {}",
            ignored.join(" ")
        ));
    }

    let channel = InstallChannel::from_environment(cli.nightly || nightly_in_rest);
    ui::banner(channel);

    match run(channel) {
        Ok(report) => render_report(&report),
        Err(err) => {
            ui::error(strategy::support::fatal_diagnostic(&err));
            std::process::exit(1);
        }
    }
}

fn run(channel: InstallChannel) -> Result<InstallReport, InstallError> {
    let host = HostProfile::detect();
    ui::info(format!("detected {}", host.describe()));

    let strategy = strategy::resolve(&host, channel);
    if strategy == Strategy::Unsupported {
        return Err(InstallError::UnsupportedPlatform);
    }
    ui::info(format!("installing via {}", strategy.display_name()));

    let workspace = ScratchWorkspace::create()?;
    workspace.guard_against_interrupt();
    let fetcher = TransportFetcher::detect();
    let runner = SystemRunner::new(host.privileged);

    let ctx = ExecutionContext {
        host: &host,
        channel,
        workspace: &workspace,
        fetcher: &fetcher,
        runner: &runner,
    };
    strategy.execute(&ctx)?;

    Ok(verify::verify(&runner))
}

fn render_report(report: &InstallReport) {
    match report.outcome {
        Outcome::Installed => {
            match &report.version {
                Some(version) => ui::success(format!("{} installed ({version})", product::NAME)),
                None => ui::success(format!("{} installed", product::NAME)),
            }
            ui::next_steps();
        }
        Outcome::NeedsShellRestart => {
            ui::warn(format!(
                "`{}` is not visible on PATH yet; open a new shell and it should be",
                product::BIN
            ));
        }
    }
}

/// `--nightly` is honored even when clap swept it into the trailing bucket
/// behind an unrecognized argument; everything else is reported and ignored.
fn sift_extra_args(rest: &[String]) -> (bool, Vec<String>) {
    let mut nightly = false;
    let mut ignored = Vec::new();
    for arg in rest {
        if arg == "--nightly" {
            nightly = true;
        } else {
            ignored.push(arg.clone());
        }
    }
    (nightly, ignored)
}
