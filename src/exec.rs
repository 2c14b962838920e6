//! External command execution behind an injectable seam.
//!
//! Strategies never call a package manager directly; they describe the
//! invocation as a [`CommandSpec`] and hand it to a [`CommandRunner`]. The
//! production runner shells out through duct and escalates with `sudo` only
//! when the spec asks for root and the process does not already have it.

use anyhow::{Result, anyhow};
use duct::cmd;

/// One external command invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Run as superuser; prefixed with `sudo` when the process is not root.
    pub needs_root: bool,
    /// Capture output instead of inheriting the terminal.
    pub quiet: bool,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            needs_root: false,
            quiet: false,
            env: Vec::new(),
        }
    }

    pub fn as_root(mut self) -> Self {
        self.needs_root = true;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn render(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Best human-readable account of what the command reported.
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        "exited with failure".to_string()
    }
}

pub trait CommandRunner {
    /// Run a command to completion. Spawn failures (program missing and the
    /// like) surface as a failed output rather than a separate error so
    /// fallback chains treat them like any other failed attempt.
    fn run(&self, spec: &CommandSpec) -> CommandOutput;
}

/// Run and convert failure into an error carrying the command's diagnostic.
pub fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<CommandOutput> {
    let output = runner.run(spec);
    if output.success {
        Ok(output)
    } else {
        Err(anyhow!("`{}`: {}", spec.render(), output.detail()))
    }
}

/// Production runner backed by duct.
pub struct SystemRunner {
    privileged: bool,
}

impl SystemRunner {
    pub fn new(privileged: bool) -> Self {
        Self { privileged }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        let (program, args) = if spec.needs_root && !self.privileged {
            let mut args = Vec::with_capacity(spec.args.len() + 1);
            args.push(spec.program.clone());
            args.extend(spec.args.iter().cloned());
            ("sudo".to_string(), args)
        } else {
            (spec.program.clone(), spec.args.clone())
        };

        let mut expr = cmd(program.as_str(), &args).unchecked();
        for (key, value) in &spec.env {
            expr = expr.env(key, value);
        }
        if spec.quiet {
            expr = expr.stdout_capture().stderr_capture();
        }

        match expr.run() {
            Ok(output) => CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(err) => CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("failed to start `{program}`: {err}"),
            },
        }
    }
}
