//! Post-install verification: is the product invocable, and which version.

use crate::exec::{CommandRunner, CommandSpec};
use crate::product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed,
    /// Install likely succeeded but the current shell cannot see it yet.
    NeedsShellRestart,
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub outcome: Outcome,
    pub version: Option<String>,
}

pub fn verify(runner: &dyn CommandRunner) -> InstallReport {
    if which::which(product::BIN).is_err() {
        return InstallReport {
            outcome: Outcome::NeedsShellRestart,
            version: None,
        };
    }

    let output = runner.run(&CommandSpec::new(product::BIN, ["--version"]).quiet());
    InstallReport {
        outcome: Outcome::Installed,
        version: if output.success {
            first_line(&output.stdout)
        } else {
            None
        },
    }
}

fn first_line(raw: &str) -> Option<String> {
    let line = raw.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
