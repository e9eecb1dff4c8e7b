//! Command implementations for the fapp CLI

pub mod completions;
