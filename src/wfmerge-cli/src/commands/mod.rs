//! Command handlers for wfmerge CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod inspect;
pub mod merge;
