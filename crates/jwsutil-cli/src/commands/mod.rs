//! Subcommand implementations.

pub mod convert;
pub mod inspect;
