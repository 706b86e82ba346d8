//! Output formatting module
//!
//! Renders ranked result tables for the terminal.

mod formatter;

pub use formatter::{FormatOutcome, OutputFormat, ResultTableFormatter};
