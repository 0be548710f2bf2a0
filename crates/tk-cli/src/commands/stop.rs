//! Stop command for closing a timing session.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tk_core::Label;
use tk_db::Database;

/// Runs the stop command.
pub fn run<W: Write>(writer: &mut W, db: &mut Database, label: &Label) -> Result<()> {
    run_at(writer, db, label, tk_db::now())
}

/// Runs the stop command with an explicit stop time.
pub fn run_at<W: Write>(
    writer: &mut W,
    db: &mut Database,
    label: &Label,
    now: NaiveDateTime,
) -> Result<()> {
    let stopped = db
        .stop_at(label, now)
        .with_context(|| format!("could not stop timing for '{label}'"))?;

    writeln!(
        writer,
        "Stopped timing for '{}'. ({:.2} hours)",
        stopped.label,
        stopped.hours()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tk_db::DbError;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn stop_prints_elapsed_hours() {
        let mut db = Database::open_in_memory().unwrap();
        let label = Label::new("writing").unwrap();
        db.start_at(&label, ts("2025-03-14 09:00:00")).unwrap();

        let mut output = Vec::new();
        run_at(&mut output, &mut db, &label, ts("2025-03-14 11:30:00")).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"Stopped timing for 'writing'. (2.50 hours)");
    }

    #[test]
    fn stop_without_session_fails_with_context() {
        let mut db = Database::open_in_memory().unwrap();
        let label = Label::new("ghost").unwrap();

        let err = run(&mut Vec::new(), &mut db, &label).unwrap_err();

        assert_eq!(err.to_string(), "could not stop timing for 'ghost'");
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::NoActiveSession(_))
        ));
        assert!(db.list_entries().unwrap().is_empty());
    }
}
