//! Output formatting module for the resdiff CLI
//!
//! Every command renders through the same [`Outputter`] trait in one of two
//! formats: table (human-readable, colored) or json (machine-readable).
//!
//! Colors and truncation follow whether stdout is a terminal.

use clap::ValueEnum;
use serde::Serialize;
use std::io::IsTerminal;
use std::str::FromStr;

mod json;
mod report;
mod table;

pub use self::json::JsonOutput;
pub use self::report::ReportList;
pub use self::table::TableOutput;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable listing with a summary table (default)
    #[default]
    Table,
    /// JSON format for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// How a report is rendered on stdout.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
    /// Shorten previews and wrap tables to the terminal width.
    pub truncate: bool,
    /// Single-line JSON, borderless tables.
    pub compact: bool,
}

impl OutputConfig {
    /// Plain rendering, as used for piped output: no colors, no truncation.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: false,
            truncate: false,
            compact: false,
        }
    }

    /// Settings for the current stdout.
    ///
    /// Colors and truncation are enabled only on a terminal. A configured
    /// `color` value overrides the color choice either way.
    pub fn for_stdout(format: OutputFormat, color: Option<bool>, compact: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        Self {
            color: color.unwrap_or(is_tty),
            truncate: is_tty,
            compact,
            ..Self::new(format)
        }
    }
}

/// Trait for types that can be formatted as output
pub trait Outputter: Serialize {
    /// Render as table format
    fn to_table(&self, config: &OutputConfig) -> String;

    /// Render as JSON format
    fn to_json(&self, config: &OutputConfig) -> String {
        JsonOutput::format(self, config)
    }

    /// Render using the format specified in config
    fn render(&self, config: &OutputConfig) -> String {
        match config.format {
            OutputFormat::Table => self.to_table(config),
            OutputFormat::Json => self.to_json(config),
        }
    }
}

/// Result wrapper pairing data with its rendering config
pub struct Output<'a, T> {
    data: &'a T,
    config: &'a OutputConfig,
}

impl<'a, T: Outputter> Output<'a, T> {
    pub fn new(data: &'a T, config: &'a OutputConfig) -> Self {
        Self { data, config }
    }

    /// Render the output to stdout
    pub fn render(&self) -> anyhow::Result<()> {
        println!("{}", self.render_to_string());
        Ok(())
    }

    /// Get the rendered string without printing
    pub fn render_to_string(&self) -> String {
        self.data.render(self.config)
    }
}

/// Truncate a string to a maximum number of characters, adding an ellipsis.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let truncated: String = s.chars().take(max_width - 3).collect();
        format!("{}...", truncated)
    }
}

/// First line of a block of text, trimmed.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

/// Get terminal width, defaulting to 80 if unavailable
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("héllo", 5), "héllo");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("let f = () => {\n  1\n}"), "let f = () => {");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_plain_config() {
        let config = OutputConfig::new(OutputFormat::Json);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.color);
        assert!(!config.truncate);
        assert!(!config.compact);
    }

    #[test]
    fn test_stdout_config_honors_color_override() {
        let config = OutputConfig::for_stdout(OutputFormat::Table, Some(true), true);
        assert!(config.color);
        assert!(config.compact);

        let config = OutputConfig::for_stdout(OutputFormat::Table, Some(false), false);
        assert!(!config.color);
        assert!(!config.compact);
    }
}
