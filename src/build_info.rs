//! Compile-time build metadata exposed to CLI surfaces.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("TUNNELCHAT_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("TUNNELCHAT_BUILD_TIMESTAMP");

/// Concise metadata shown in the interactive banner.
pub fn startup_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}

/// Version block printed by `tunnelchat --version`.
pub const CLI_VERSION_TEXT: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("TUNNELCHAT_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("TUNNELCHAT_BUILD_TIMESTAMP"),
);
