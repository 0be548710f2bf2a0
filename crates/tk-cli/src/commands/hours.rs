//! Hours command for the monthly per-label report.
//!
//! Human-readable output is a blank line, a header, a rule and one `label: h.hh hours`
//! line per label. `--json` emits the same rows as a JSON object.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tk_core::{LabelHours, Month, ReportQuery, Year};
use tk_db::Database;

const RULE_WIDTH: usize = 30;

/// JSON output shape.
#[derive(Debug, Serialize)]
struct HoursReport<'a> {
    month: Month,
    year: Option<Year>,
    entries: &'a [LabelHours],
}

/// Runs the hours command.
pub fn run<W: Write>(writer: &mut W, db: &Database, query: ReportQuery, json: bool) -> Result<()> {
    let rows = db
        .report(query)
        .with_context(|| format!("failed to compute hours for {}", period(query)))?;

    if json {
        let report = HoursReport {
            month: query.month,
            year: query.year,
            entries: &rows,
        };
        serde_json::to_writer_pretty(&mut *writer, &report).context("failed to serialize report")?;
        writeln!(writer)?;
        return Ok(());
    }

    if rows.is_empty() {
        writeln!(writer, "No entries found for {}", period(query))?;
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "Hours for {}:", period(query))?;
    writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
    for row in &rows {
        writeln!(writer, "{}: {:.2} hours", row.label, row.hours)?;
    }
    Ok(())
}

fn period(query: ReportQuery) -> String {
    match query.year {
        Some(year) => format!("{year}-{:02}", query.month.value()),
        None => format!("month {}", query.month),
    }
}
