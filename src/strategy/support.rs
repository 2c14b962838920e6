//! Manual remediation text. Every fatal diagnostic ends with the full
//! cross-family instructions, since the user may need to switch approaches
//! entirely rather than retry the one that failed.

use crate::channel::InstallChannel;
use crate::error::InstallError;
use crate::product;

pub fn manual_install_help() -> String {
    let deb_name = format!("{}.deb", product::BIN);
    let rpm_name = format!("{}.rpm", product::BIN);
    let deb_url = InstallChannel::Stable.artifact_url(&deb_name);
    let rpm_url = InstallChannel::Stable.artifact_url(&rpm_name);
    format!(
        "To install manually, pick your platform:\n\
         \x20 macOS (Homebrew):  brew install {}\n\
         \x20 Debian/Ubuntu:     curl -fsSLO {deb_url} && sudo apt-get install -y ./{deb_name}\n\
         \x20 Fedora/RHEL:       sudo rpm -U {rpm_url}\n\
         \x20 Nix:               nix profile install {}\n\
         Docs: {}",
        product::BREW_FORMULA,
        product::FLAKE_STABLE,
        product::DOCS_URL,
    )
}

/// Render a fatal error together with the remediation text.
pub fn fatal_diagnostic(err: &InstallError) -> String {
    format!("{err}\n\n{}", manual_install_help())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_diagnostic_covers_every_known_family() {
        let text = fatal_diagnostic(&InstallError::UnsupportedPlatform);
        assert!(text.contains("brew install"));
        assert!(text.contains("apt-get install"));
        assert!(text.contains("rpm -U"));
        assert!(text.contains("nix profile install"));
    }

    #[test]
    fn diagnostic_leads_with_the_failure() {
        let text = fatal_diagnostic(&InstallError::UnsupportedPlatform);
        assert!(text.starts_with("no supported package manager"));
    }
}
