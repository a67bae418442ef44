//! Formatting utilities for CLI output.

use serde_json::Value;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";
    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
}

/// Formats success messages with green styling
pub fn format_success(text: &str) -> String {
    format!("{}{}{}", Colors::GREEN, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a looked-up JSON value for CLI output.
///
/// Scalars print as JSON literals; arrays and objects print compactly.
/// A missing value prints as a dimmed `<absent>` marker.
///
/// # Examples
///
/// ```
/// use confkeep::cli::formatting::format_json_value;
///
/// let value = serde_json::json!("hello");
/// assert_eq!(format_json_value(Some(&value)), "\"hello\"");
///
/// let value = serde_json::json!({"a": [1, 2]});
/// assert_eq!(format_json_value(Some(&value)), "{\"a\":[1,2]}");
/// ```
pub fn format_json_value(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => format!("{}<absent>{}", Colors::DIM, Colors::RESET),
    }
}
