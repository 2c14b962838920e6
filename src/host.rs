//! Read-only host probing: OS family, CPU architecture, privilege level and
//! which candidate package managers are present. Probing never fails;
//! anything unrecognized is represented and left for the resolver to judge.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use sudo::RunningAs;

/// A class of host platform sharing an installation mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    DebianLike,
    RpmLike,
    NixOs,
    LinuxUnknown,
    Other,
}

impl OsFamily {
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "macos" => Self::MacOs,
            "linux" => Self::detect_linux(),
            _ => Self::Other,
        }
    }

    fn detect_linux() -> Self {
        if Path::new("/etc/NIXOS").exists() {
            return Self::NixOs;
        }
        if let Ok(content) = fs::read_to_string("/etc/os-release")
            && let Some(family) = Self::from_os_release(&content)
        {
            return family;
        }
        // Marker files catch minimal systems that ship no os-release.
        if Path::new("/etc/debian_version").exists() {
            return Self::DebianLike;
        }
        if Path::new("/etc/redhat-release").exists() || Path::new("/etc/fedora-release").exists() {
            return Self::RpmLike;
        }
        Self::LinuxUnknown
    }

    /// Classify an os-release document by ID, falling back to ID_LIKE.
    fn from_os_release(content: &str) -> Option<Self> {
        let mut id = String::new();
        let mut id_like = String::new();

        for line in content.lines() {
            if let Some(val) = line.strip_prefix("ID=") {
                id = val.trim_matches('"').to_string();
            } else if let Some(val) = line.strip_prefix("ID_LIKE=") {
                id_like = val.trim_matches('"').to_string();
            }
        }

        match id.as_str() {
            "nixos" => Some(Self::NixOs),
            "debian" | "ubuntu" | "pop" | "linuxmint" | "raspbian" => Some(Self::DebianLike),
            "fedora" | "centos" | "rhel" | "rocky" | "almalinux" | "amzn" | "opensuse"
            | "opensuse-leap" | "opensuse-tumbleweed" => Some(Self::RpmLike),
            _ => {
                if id_like.contains("debian") || id_like.contains("ubuntu") {
                    Some(Self::DebianLike)
                } else if id_like.contains("fedora")
                    || id_like.contains("rhel")
                    || id_like.contains("suse")
                {
                    Some(Self::RpmLike)
                } else {
                    None
                }
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::DebianLike => "Debian-like Linux",
            Self::RpmLike => "RPM-based Linux",
            Self::NixOs => "NixOS",
            Self::LinuxUnknown => "unrecognized Linux",
            Self::Other => "unrecognized OS",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// CPU architecture with artifact-naming normalization applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Architecture {
    X86_64,
    Aarch64,
    Other(String),
}

impl Architecture {
    /// Normalize a raw machine string. Total and idempotent: known aliases
    /// collapse, everything else passes through verbatim.
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "x86_64" | "amd64" => Self::X86_64,
            "aarch64" | "arm64" => Self::Aarch64,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn detect() -> Self {
        Self::normalize(std::env::consts::ARCH)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate package manager the probe looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Manager {
    Homebrew,
    Apt,
    DnfOrYum,
    Nix,
}

impl Manager {
    fn is_present(self) -> bool {
        match self {
            Self::Homebrew => which::which("brew").is_ok(),
            Self::Apt => which::which("apt-get").is_ok(),
            Self::DnfOrYum => which::which("dnf").is_ok() || which::which("yum").is_ok(),
            Self::Nix => which::which("nix").is_ok(),
        }
    }

    fn probe_all() -> BTreeSet<Self> {
        [Self::Homebrew, Self::Apt, Self::DnfOrYum, Self::Nix]
            .into_iter()
            .filter(|m| m.is_present())
            .collect()
    }
}

/// Immutable snapshot of the host, captured once at process start.
#[derive(Debug, Clone)]
pub struct HostProfile {
    pub os_family: OsFamily,
    pub arch: Architecture,
    pub privileged: bool,
    pub managers: BTreeSet<Manager>,
}

impl HostProfile {
    pub fn detect() -> Self {
        Self {
            os_family: OsFamily::detect(),
            arch: Architecture::detect(),
            privileged: matches!(sudo::check(), RunningAs::Root),
            managers: Manager::probe_all(),
        }
    }

    pub fn has_manager(&self, manager: Manager) -> bool {
        self.managers.contains(&manager)
    }

    pub fn describe(&self) -> String {
        format!(
            "{} on {}{}",
            self.os_family,
            self.arch,
            if self.privileged { " (running as root)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_total_and_idempotent() {
        assert_eq!(Architecture::normalize("amd64"), Architecture::X86_64);
        assert_eq!(Architecture::normalize("x86_64"), Architecture::X86_64);
        assert_eq!(Architecture::normalize("arm64"), Architecture::Aarch64);
        assert_eq!(Architecture::normalize("aarch64"), Architecture::Aarch64);
        assert_eq!(
            Architecture::normalize("riscv64"),
            Architecture::Other("riscv64".to_string())
        );

        for raw in ["amd64", "arm64", "x86_64", "aarch64", "riscv64"] {
            let once = Architecture::normalize(raw);
            let twice = Architecture::normalize(once.as_str());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn os_release_id_classification() {
        let ubuntu = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\n";
        assert_eq!(
            OsFamily::from_os_release(ubuntu),
            Some(OsFamily::DebianLike)
        );

        let fedora = "NAME=\"Fedora Linux\"\nID=fedora\n";
        assert_eq!(OsFamily::from_os_release(fedora), Some(OsFamily::RpmLike));

        let nixos = "ID=nixos\nNAME=NixOS\n";
        assert_eq!(OsFamily::from_os_release(nixos), Some(OsFamily::NixOs));
    }

    #[test]
    fn os_release_falls_back_to_id_like() {
        let derived = "ID=zorin\nID_LIKE=\"ubuntu debian\"\n";
        assert_eq!(
            OsFamily::from_os_release(derived),
            Some(OsFamily::DebianLike)
        );

        let rolling = "ID=gentoo\n";
        assert_eq!(OsFamily::from_os_release(rolling), None);
    }

    #[test]
    fn detection_never_panics() {
        let profile = HostProfile::detect();
        // Whatever the machine, the probe must represent it.
        let _ = profile.describe();
    }
}
