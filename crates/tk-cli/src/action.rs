//! Resolution of parsed arguments into validated store actions.
//!
//! Defaults (configured label, current month) are filled in here, once,
//! before the store is opened. Invalid input never reaches the database.

use tk_core::{Label, Month, ReportQuery, ValidationError, Year};

use crate::{Commands, Config};

/// A fully resolved command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start(Label),
    Stop(Label),
    Hours { query: ReportQuery, json: bool },
    Status,
}

impl Action {
    /// Resolves `command` against `config`, using `current_month` when no month is given.
    pub fn resolve(
        command: &Commands,
        config: &Config,
        current_month: Month,
    ) -> Result<Self, ValidationError> {
        let label = |label: &Option<String>| {
            Label::new(label.as_deref().unwrap_or(&config.default_label))
        };

        match command {
            Commands::Start { label: l } => Ok(Self::Start(label(l)?)),
            Commands::Stop { label: l } => Ok(Self::Stop(label(l)?)),
            Commands::Hours { month, year, json } => {
                let month = month.map(Month::new).transpose()?.unwrap_or(current_month);
                let mut query = ReportQuery::month(month);
                if let Some(year) = year {
                    query = query.in_year(Year::new(*year)?);
                }
                Ok(Self::Hours { query, json: *json })
            }
            Commands::Status => Ok(Self::Status),
        }
    }
}
