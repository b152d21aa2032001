//! XDG-style path resolution for configuration.

use std::path::PathBuf;

/// Returns the configuration directory for lingo.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/lingo` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/lingo` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join("lingo"),
        |xdg| PathBuf::from(xdg).join("lingo"),
    )
}

/// Returns the user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
#[allow(clippy::expect_used)]
fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Failed to determine home directory")
}
