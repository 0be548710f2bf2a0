//! Core domain types for timekeep.
//!
//! This crate contains the validated values passed between the command
//! surface and the time entry store:
//! - Labels, months and years with their validation rules
//! - Report queries and per-label hour totals

mod report;
mod types;

pub use report::{LabelHours, ReportQuery, hours_between};
pub use types::{Label, Month, ValidationError, Year};
