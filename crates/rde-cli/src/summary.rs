//! Terminal rendering of schema listings and batch reports.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

use rde_model::{FilesSchema, Layout};
use rde_validate::{BatchReport, OutcomeStatus, RuleInfo};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// One `- <kind>: <description>` line per file-kind, in schema order.
pub fn kinds_plain(schema: &FilesSchema) -> String {
    schema
        .kinds()
        .iter()
        .map(|kind| format!("- {}: {}", kind.id, kind.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn kinds_table(schema: &FilesSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Kind", "Description", "Layout", "Delimiter"]);
    apply_table_style(&mut table);
    for kind in schema.kinds() {
        let delimiter = kind
            .delimiter
            .map(|byte| char::from(byte).to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&kind.id),
            Cell::new(&kind.description),
            Cell::new(describe_layout(&kind.layout)),
            Cell::new(delimiter).set_alignment(CellAlignment::Center),
        ]);
    }
    table
}

/// Short human summary of a layout, e.g. `3 sections (last unbounded)`.
pub fn describe_layout(layout: &Layout) -> String {
    match layout {
        Layout::Flat(lines) => format!("flat, {} line(s)", lines.len()),
        Layout::Sectioned(sections) => {
            let open = sections.last().is_some_and(|section| section.is_unbounded());
            let mut text = format!("{} section(s)", sections.len());
            if open {
                text.push_str(" (last unbounded)");
            }
            text
        }
    }
}

pub fn rules_table(rules: &[RuleInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rule", "Argument", "Cell must"]);
    apply_table_style(&mut table);
    for rule in rules {
        table.add_row(vec![
            rule.key.clone(),
            if rule.takes_argument { "yes" } else { "no" }.to_string(),
            rule.description.clone(),
        ]);
    }
    table
}

pub fn report_table(report: &BatchReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["File-spec", "Status", "Lines", "Sections"]);
    apply_table_style(&mut table);
    for record in report.records() {
        let (label, color) = match record.status {
            OutcomeStatus::Ok => ("ok", Color::Green),
            OutcomeStatus::Failed => ("FAILED", Color::Red),
            OutcomeStatus::Skipped => ("skipped", Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(record.spec),
            Cell::new(label).fg(color),
            count_cell(record.lines),
            count_cell(record.sections),
        ]);
    }
    table
}

fn count_cell(count: Option<usize>) -> Cell {
    let text = count.map_or_else(|| "-".to_string(), |count| count.to_string());
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// `N passed, M failed, K skipped` footer for the report.
pub fn report_footer(report: &BatchReport) -> String {
    let mut footer = format!(
        "{} passed, {} failed",
        report.passed_count(),
        report.failed_count()
    );
    if !report.skipped.is_empty() {
        footer.push_str(&format!(", {} skipped", report.skipped.len()));
    }
    footer
}
