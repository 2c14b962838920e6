//! Process-lifetime scratch directory for downloaded artifacts.
//!
//! Removal is guaranteed on every exit path: `TempDir` handles normal return
//! and early fatal return, a SIGINT handler covers interruption.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ui;

pub struct ScratchWorkspace {
    dir: tempfile::TempDir,
}

impl ScratchWorkspace {
    pub fn create() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("lodestone-install-")
            .tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Register the interrupt handler that tears the workspace down before
    /// the process dies. Failure to register is reported but not fatal.
    pub fn guard_against_interrupt(&self) {
        let path = self.path().to_path_buf();
        if let Err(err) = ctrlc::set_handler(move || {
            remove_on_interrupt(&path);
            std::process::exit(130);
        }) {
            ui::warn(format!("could not register interrupt cleanup: {err}"));
        }
    }
}

/// Interrupt-path cleanup, separated so it can be exercised directly.
fn remove_on_interrupt(path: &Path) {
    let _ = fs::remove_dir_all(path);
    eprintln!("\ninterrupted; removed scratch workspace");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_after_successful_run() {
        let workspace = ScratchWorkspace::create().unwrap();
        let path = workspace.path().to_path_buf();
        fs::write(workspace.artifact_path("pkg.deb"), b"payload").unwrap();
        assert!(path.exists());
        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn removed_after_interrupt() {
        let workspace = ScratchWorkspace::create().unwrap();
        let path = workspace.path().to_path_buf();
        fs::write(workspace.artifact_path("partial.rpm"), b"partial").unwrap();

        remove_on_interrupt(&path);
        assert!(!path.exists());
    }

    #[test]
    fn artifact_paths_live_inside_the_workspace() {
        let workspace = ScratchWorkspace::create().unwrap();
        let artifact = workspace.artifact_path("lodestone.deb");
        assert!(artifact.starts_with(workspace.path()));
    }
}
