//! Time tracking CLI library.
//!
//! This crate provides the command-line surface for the time entry store.

mod action;
mod cli;
pub mod commands;
mod config;

pub use action::Action;
pub use cli::{Cli, Commands};
pub use config::Config;
