//! Status command for showing open sessions.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tk_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, database_path: &Path) -> Result<()> {
    run_at(writer, db, database_path, tk_db::now())
}

pub fn run_at<W: Write>(
    writer: &mut W,
    db: &Database,
    database_path: &Path,
    now: NaiveDateTime,
) -> Result<()> {
    let open = db.open_entries().context("failed to list open sessions")?;

    writeln!(writer, "Database: {}", database_path.display())?;

    if open.is_empty() {
        writeln!(writer, "No active sessions.")?;
        return Ok(());
    }

    writeln!(writer, "Active sessions:")?;
    for entry in open {
        writeln!(
            writer,
            "- {}: started {} ({:.2} hours)",
            entry.label,
            entry.start_time.format("%Y-%m-%d %H:%M:%S"),
            entry.elapsed_hours(now)
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tk_core::Label;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn status_lists_open_sessions() {
        let mut db = Database::open_in_memory().unwrap();
        let work = Label::new("work").unwrap();
        let writing = Label::new("writing").unwrap();
        db.start_at(&writing, ts("2025-03-14 08:00:00")).unwrap();
        db.stop_at(&writing, ts("2025-03-14 08:30:00")).unwrap();
        db.start_at(&work, ts("2025-03-14 09:00:00")).unwrap();
        db.start_at(&writing, ts("2025-03-14 10:00:00")).unwrap();

        let mut output = Vec::new();
        run_at(
            &mut output,
            &db,
            Path::new("/data/timekeep.sqlite"),
            ts("2025-03-14 10:15:00"),
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Database: /data/timekeep.sqlite
        Active sessions:
        - work: started 2025-03-14 09:00:00 (1.25 hours)
        - writing: started 2025-03-14 10:00:00 (0.25 hours)
        ");
    }

    #[test]
    fn status_with_nothing_open() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, Path::new("/data/timekeep.sqlite")).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Database: /data/timekeep.sqlite
        No active sessions.
        ");
    }
}
