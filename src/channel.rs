//! Release channel selection.

use std::env;
use std::fmt;

use crate::product;

/// Environment variable equivalent of `--nightly`. The explicit flag wins
/// when both are present.
pub const CHANNEL_ENV: &str = "LODESTONE_CHANNEL";

/// A named release track determining which artifact set is fetched.
/// Immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallChannel {
    Stable,
    Nightly,
}

impl InstallChannel {
    /// Resolve the channel from its precedence inputs:
    /// explicit flag > environment variable > default (stable).
    /// Unrecognized environment values fall back to stable.
    pub fn resolve(nightly_flag: bool, env_value: Option<&str>) -> Self {
        if nightly_flag {
            return Self::Nightly;
        }
        match env_value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "nightly" => Self::Nightly,
            _ => Self::Stable,
        }
    }

    /// Resolve from the real process environment, warning about values that
    /// name no known channel.
    pub fn from_environment(nightly_flag: bool) -> Self {
        let env_value = env::var(CHANNEL_ENV).ok();
        if let Some(v) = env_value.as_deref() {
            let normalized = v.trim().to_ascii_lowercase();
            if !normalized.is_empty() && normalized != "stable" && normalized != "nightly" {
                crate::ui::warn(format!(
                    "{CHANNEL_ENV}={v} names no known channel, using stable"
                ));
            }
        }
        Self::resolve(nightly_flag, env_value.as_deref())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Nightly => "nightly",
        }
    }

    /// URL of a named artifact on the channel-partitioned host.
    pub fn artifact_url(self, name: &str) -> String {
        format!("{}/{}/{}", product::ARTIFACT_HOST, self.as_str(), name)
    }
}

impl fmt::Display for InstallChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn flag_beats_environment() {
        assert_eq!(
            InstallChannel::resolve(true, Some("stable")),
            InstallChannel::Nightly
        );
        assert_eq!(InstallChannel::resolve(true, None), InstallChannel::Nightly);
    }

    #[test]
    fn environment_beats_default() {
        assert_eq!(
            InstallChannel::resolve(false, Some("nightly")),
            InstallChannel::Nightly
        );
        assert_eq!(
            InstallChannel::resolve(false, Some("NIGHTLY")),
            InstallChannel::Nightly
        );
    }

    #[test]
    fn defaults_to_stable() {
        assert_eq!(InstallChannel::resolve(false, None), InstallChannel::Stable);
        assert_eq!(
            InstallChannel::resolve(false, Some("stable")),
            InstallChannel::Stable
        );
        assert_eq!(
            InstallChannel::resolve(false, Some("beta")),
            InstallChannel::Stable
        );
    }

    #[test]
    #[serial]
    fn reads_process_environment() {
        unsafe { env::set_var(CHANNEL_ENV, "nightly") };
        assert_eq!(
            InstallChannel::from_environment(false),
            InstallChannel::Nightly
        );
        assert_eq!(
            InstallChannel::from_environment(true),
            InstallChannel::Nightly
        );
        unsafe { env::set_var(CHANNEL_ENV, "stable") };
        assert_eq!(
            InstallChannel::from_environment(true),
            InstallChannel::Nightly
        );
        unsafe { env::remove_var(CHANNEL_ENV) };
        assert_eq!(
            InstallChannel::from_environment(false),
            InstallChannel::Stable
        );
    }

    #[test]
    fn artifact_urls_are_channel_partitioned() {
        assert_eq!(
            InstallChannel::Stable.artifact_url("lodestone.deb"),
            "https://artifacts.lodestone.dev/stable/lodestone.deb"
        );
        assert_eq!(
            InstallChannel::Nightly.artifact_url("lodestone.rpm"),
            "https://artifacts.lodestone.dev/nightly/lodestone.rpm"
        );
    }
}
