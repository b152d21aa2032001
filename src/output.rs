//! Global output configuration and utilities.
//!
//! Output discipline:
//!
//! - Listings (languages, providers) go to stdout
//! - Status messages, progress, and per-file errors go to stderr
//! - Quiet mode suppresses non-essential output
//! - Colors can be disabled via flag or the NO_COLOR environment variable

use std::sync::OnceLock;

/// Global output configuration.
static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

/// Output configuration settings.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Disable colored output.
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            // https://no-color.org/
            no_color: std::env::var("NO_COLOR").is_ok(),
        }
    }
}

/// Initialize the global output configuration.
///
/// Called once at startup with the CLI flags; subsequent calls are ignored.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

/// Get the current output configuration.
pub fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(OutputConfig::default)
}

/// Check if quiet mode is enabled.
pub fn is_quiet() -> bool {
    config().quiet
}

/// Check if colors are disabled.
pub fn is_no_color() -> bool {
    config().no_color
}

/// Print a status message to stderr (respects quiet mode).
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Print a warning message to stderr (always shown, even in quiet mode).
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}
