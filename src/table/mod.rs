//! Results table model
//!
//! Parses the LaTeX tables written by the evaluation tool and orders their
//! rows by a score column.

mod parser;
mod sort;

pub use parser::ResultsTable;
pub use sort::DEFAULT_SORT_COLUMN;
