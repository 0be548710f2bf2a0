//! CLI subcommand implementations.

pub mod hours;
pub mod start;
pub mod status;
pub mod stop;
