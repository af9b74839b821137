//! Caregiver activity log CLI library.
//!
//! This crate provides the terminal interface over the carelog coordinator.

mod cli;
pub mod commands;
mod config;

pub use cli::{ChildrenAction, Cli, Commands};
pub use config::Config;
