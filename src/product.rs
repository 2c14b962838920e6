//! Names and endpoints for the product this installer ships.

/// Human-facing product name.
pub const NAME: &str = "Lodestone";

/// Binary the product installs onto PATH.
pub const BIN: &str = "lodestone";

/// Channel-partitioned artifact host. Per channel it serves a signing key,
/// architecture-specific packages and a generic fallback package.
pub const ARTIFACT_HOST: &str = "https://artifacts.lodestone.dev";

pub const DOCS_URL: &str = "https://docs.lodestone.dev";

/// Homebrew formula name.
pub const BREW_FORMULA: &str = "lodestone";

/// Official Homebrew bootstrap script, run when `brew` itself is missing.
pub const BREW_BOOTSTRAP_URL: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Keyring artifact name for the Debian family.
pub const DEB_KEYRING: &str = "lodestone-archive-keyring.gpg";

/// Detached signing key artifact name for the RPM family.
pub const RPM_KEY: &str = "lodestone.asc";

/// Flake installables, one per channel.
pub const FLAKE_STABLE: &str = "github:lodestone-dev/lodestone";
pub const FLAKE_NIGHTLY: &str = "github:lodestone-dev/lodestone/nightly";

/// Binary cache the Nix strategies want trusted before a profile install.
pub const NIX_CACHE_URL: &str = "https://cache.lodestone.dev";
pub const NIX_CACHE_KEY: &str =
    "cache.lodestone.dev-1:o7fSlcZzRGGkFxnnHaRZQtkYnVdRmGWKWRjiFiLJ0zA=";
