//! Table output formatting using the `tabled` crate

use super::{terminal_width, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Create a table from rows of strings, right-aligning numeric columns
    /// listed in `numeric`.
    pub fn from_rows(
        headers: &[&str],
        rows: &[Vec<String>],
        numeric: &[usize],
        config: &OutputConfig,
    ) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            builder.push_record(row.iter().map(|s| s.as_str()));
        }

        let mut table = builder.build();

        if config.compact {
            table.with(Style::blank());
        } else {
            table.with(Style::rounded());
        }

        for &column in numeric {
            table.with(Modify::new(Columns::single(column)).with(Alignment::right()));
        }

        if config.truncate {
            table.with(Width::wrap(terminal_width()));
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_from_rows() {
        let headers = vec!["Category", "Added"];
        let rows = vec![
            vec!["functions".to_string(), "2".to_string()],
            vec!["types".to_string(), "0".to_string()],
        ];

        let config = OutputConfig::new(OutputFormat::Table);
        let output = TableOutput::from_rows(&headers, &rows, &[1], &config);

        assert!(output.contains("Category"));
        assert!(output.contains("Added"));
        assert!(output.contains("functions"));
        assert!(output.contains("types"));
    }

    #[test]
    fn test_empty_rows() {
        let config = OutputConfig::new(OutputFormat::Table);
        let output = TableOutput::from_rows(&["A"], &[], &[], &config);
        assert_eq!(output, "(no results)");
    }
}
