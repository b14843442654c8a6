//! Command implementations for the Redline CLI.

pub mod compare;
pub mod config;
