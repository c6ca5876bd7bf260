//! Rendering of change reports.

use colored::Colorize;
use serde::Serialize;

use resdiff_core::differ::{ChangeType, DeclarationText, ModifiedDeclaration};
use resdiff_core::{ChangeReport, DeclarationKind, DiffSummary};

use super::{first_line, terminal_width, truncate, OutputConfig, Outputter, TableOutput};

/// Reports for several modules, serialized as a JSON array.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ReportList {
    pub reports: Vec<ChangeReport>,
}

impl Outputter for ChangeReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = render_listing(self, config);
        output.push_str(&summary_table(&self.summary(), config));
        output
    }
}

impl Outputter for ReportList {
    fn to_table(&self, config: &OutputConfig) -> String {
        if self.reports.is_empty() {
            return format!("{}", "No changed modules.".dimmed());
        }

        let mut output = String::new();
        let mut total = DiffSummary::new();
        let mut rows = Vec::new();

        for report in &self.reports {
            output.push_str(&render_listing(report, config));
            output.push('\n');

            let summary = report.summary();
            let (added, modified, deleted) = totals(&summary);
            rows.push(vec![
                report.module_name.clone(),
                added.to_string(),
                modified.to_string(),
                deleted.to_string(),
            ]);
            total.merge(&summary);
        }

        output.push_str(&TableOutput::from_rows(
            &["Module", "Added", "Modified", "Deleted"],
            &rows,
            &[1, 2, 3],
            config,
        ));
        output.push_str(&format!("\n{} {}", "TOTAL:".cyan().bold(), total.text()));
        output
    }
}

/// Colored per-change listing for one module.
fn render_listing(report: &ChangeReport, config: &OutputConfig) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        "MODULE:".cyan().bold(),
        report.module_name.bold()
    ));

    if report.is_empty() {
        output.push_str(&format!("{}\n", "No declaration changes detected.".dimmed()));
        return output;
    }
    output.push_str(&format!("{}\n\n", report.summary().text()));

    for change_type in [ChangeType::Added, ChangeType::Modified, ChangeType::Deleted] {
        let count: usize = DeclarationKind::ALL
            .iter()
            .map(|&kind| report.record(kind).count(change_type))
            .sum();
        if count == 0 {
            continue;
        }

        let heading = match change_type {
            ChangeType::Added => "ADDED".green().bold(),
            ChangeType::Modified => "MODIFIED".yellow().bold(),
            ChangeType::Deleted => "DELETED".red().bold(),
        };
        output.push_str(&format!("{} ({}):\n", heading, count));

        for kind in DeclarationKind::ALL {
            let record = report.record(kind);
            match change_type {
                ChangeType::Added => {
                    for entry in &record.added {
                        output.push_str(&text_line("+", entry, kind, change_type, config));
                    }
                }
                ChangeType::Modified => {
                    for entry in &record.modified {
                        output.push_str(&modified_line(entry, kind));
                    }
                }
                ChangeType::Deleted => {
                    for entry in &record.deleted {
                        output.push_str(&text_line("-", entry, kind, change_type, config));
                    }
                }
            }
        }
        output.push('\n');
    }

    output
}

fn text_line(
    marker: &str,
    entry: &DeclarationText,
    kind: DeclarationKind,
    change_type: ChangeType,
    config: &OutputConfig,
) -> String {
    let name = match change_type {
        ChangeType::Added => entry.name.green(),
        _ => entry.name.red(),
    };
    let mut preview = first_line(&entry.text).to_string();
    if config.truncate {
        preview = truncate(&preview, terminal_width().saturating_sub(8).max(20));
    }
    format!(
        "  {} {} [{}]\n    {}\n",
        marker,
        name,
        kind.as_str(),
        preview.dimmed()
    )
}

fn modified_line(entry: &ModifiedDeclaration, kind: DeclarationKind) -> String {
    let span = &entry.span;
    format!(
        "  ~ {} [{}]\n    {}\n",
        entry.name.yellow(),
        kind.as_str(),
        format!(
            "lines {}-{} -> {}-{}",
            span.old_start.line(),
            span.old_end.line(),
            span.new_start.line(),
            span.new_end.line()
        )
        .dimmed()
    )
}

/// Per-category counts as a table.
fn summary_table(summary: &DiffSummary, config: &OutputConfig) -> String {
    let rows: Vec<Vec<String>> = DeclarationKind::ALL
        .iter()
        .map(|&kind| {
            let (added, modified, deleted) = summary.counts(kind);
            vec![
                kind.plural().to_string(),
                added.to_string(),
                modified.to_string(),
                deleted.to_string(),
            ]
        })
        .collect();

    TableOutput::from_rows(
        &["Category", "Added", "Modified", "Deleted"],
        &rows,
        &[1, 2, 3],
        config,
    )
}

fn totals(summary: &DiffSummary) -> (u32, u32, u32) {
    DeclarationKind::ALL
        .iter()
        .map(|&kind| summary.counts(kind))
        .fold((0, 0, 0), |acc, (a, m, d)| (acc.0 + a, acc.1 + m, acc.2 + d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use resdiff_core::differ::SpanChange;
    use resdiff_core::types::Point;

    fn sample_report() -> ChangeReport {
        let mut report = ChangeReport::new("Math");
        report
            .functions
            .added
            .push(DeclarationText::new("helper", "let helper = () => 1"));
        report.types.modified.push(ModifiedDeclaration {
            name: "t".to_string(),
            old_text: "type t = int".to_string(),
            new_text: "type t = float".to_string(),
            span: SpanChange {
                old_start: Point::new(0, 0),
                old_end: Point::new(0, 12),
                new_start: Point::new(4, 0),
                new_end: Point::new(4, 14),
            },
        });
        report
    }

    fn plain(format: OutputFormat) -> OutputConfig {
        colored::control::set_override(false);
        OutputConfig::new(format)
    }

    #[test]
    fn test_report_table() {
        let output = sample_report().render(&plain(OutputFormat::Table));

        assert!(output.contains("MODULE: Math"));
        assert!(output.contains("ADDED (1):"));
        assert!(output.contains("+ helper [function]"));
        assert!(output.contains("let helper = () => 1"));
        assert!(output.contains("MODIFIED (1):"));
        assert!(output.contains("~ t [type]"));
        assert!(output.contains("lines 1-1 -> 5-5"));
        assert!(!output.contains("DELETED"));
        assert!(output.contains("Category"));
    }

    #[test]
    fn test_empty_report_table() {
        let output = ChangeReport::new("Same").render(&plain(OutputFormat::Table));
        assert!(output.contains("No declaration changes detected."));
    }

    #[test]
    fn test_report_json() {
        let output = sample_report().render(&plain(OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["moduleName"], "Math");
        assert_eq!(value["addedFunctions"][0][0], "helper");
        assert_eq!(value["modifiedTypes"][0][3]["new_start"][0], 4);
    }

    #[test]
    fn test_report_list() {
        let list = ReportList {
            reports: vec![sample_report(), ChangeReport::new("Other")],
        };

        let json: serde_json::Value =
            serde_json::from_str(&list.render(&plain(OutputFormat::Json))).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);

        let table = list.render(&plain(OutputFormat::Table));
        assert!(table.contains("MODULE: Other"));
        assert!(table.contains("Module"));
        assert!(table.contains("TOTAL: functions: 1 added; types: 1 modified"));
    }

    #[test]
    fn test_empty_report_list() {
        let output = ReportList::default().render(&plain(OutputFormat::Table));
        assert_eq!(output, "No changed modules.");
    }
}
