//! Fatal failure taxonomy. Soft conditions (missing signing key, post-install
//! verification miss) are warnings elsewhere and never reach this enum.

use thiserror::Error;

use crate::channel::InstallChannel;
use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("no supported package manager was found for this host")]
    UnsupportedPlatform,

    #[error("could not create scratch workspace: {0}")]
    Workspace(#[from] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{manager} bootstrap did not produce a usable installation: {detail}")]
    BootstrapFailed {
        manager: &'static str,
        detail: String,
    },

    #[error("no usable {channel} package was found for this host")]
    NoUsablePackage { channel: InstallChannel },

    #[error("{tool} failed to install the package: {detail}")]
    PackageManagerFailed {
        tool: &'static str,
        detail: String,
    },

    #[error("nix profile install failed: {detail}")]
    ProfileInstallFailed { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_absence_renders_distinctly() {
        let err = InstallError::from(FetchError::NoTransport);
        assert!(err.to_string().contains("curl or wget"));

        let network = InstallError::from(FetchError::Failed {
            url: "https://example.invalid/x".into(),
            detail: "timed out".into(),
        });
        assert!(network.to_string().contains("timed out"));
        assert_ne!(err.to_string(), network.to_string());
    }

    #[test]
    fn missing_package_names_the_channel() {
        let err = InstallError::NoUsablePackage {
            channel: InstallChannel::Nightly,
        };
        assert!(err.to_string().contains("nightly"));
    }
}
