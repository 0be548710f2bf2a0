//! Start command for opening a timing session.

use std::io::Write;

use anyhow::{Context, Result};
use tk_core::Label;
use tk_db::Database;

/// Runs the start command.
pub fn run<W: Write>(writer: &mut W, db: &mut Database, label: &Label) -> Result<()> {
    let started = db
        .start(label)
        .with_context(|| format!("could not start timing for '{label}'"))?;
    tracing::debug!(id = started.id, "session opened");

    writeln!(writer, "Started timing for '{}'", started.label)?;
    Ok(())
}
