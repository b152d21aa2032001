//! Consistent styling utilities for CLI output.
//!
//! Provides color and formatting helpers using owo-colors. Every helper
//! degrades to plain text when colors are disabled.

use owo_colors::OwoColorize;
use std::fmt::Display;

use crate::output;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Style for section headers (e.g., "Supported language codes")
    pub fn header<T: Display>(text: T) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.bold())
        }
    }

    /// Style for primary values (e.g., provider names, file names)
    pub fn value<T: Display>(text: T) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.cyan())
        }
    }

    /// Style for secondary/supplementary info (e.g., endpoints, counts)
    pub fn secondary<T: Display>(text: T) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.dimmed())
        }
    }

    /// Style for success messages
    pub fn success<T: Display>(text: T) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.green())
        }
    }

    /// Style for error messages
    pub fn error<T: Display>(text: T) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.red().bold())
        }
    }

    /// Style for warning messages
    pub fn warning<T: Display>(text: T) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.yellow())
        }
    }

    /// Style for language codes
    pub fn code<T: Display>(text: T) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.yellow())
        }
    }

    /// Style for the default marker
    pub fn default_marker() -> String {
        Self::secondary("(default)")
    }
}
