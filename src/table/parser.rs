//! LaTeX tabular parsing
//!
//! Only the ampersand-delimited lines of a `tabular` fragment carry data;
//! everything else (`\begin{tabular}`, `\toprule`, captions) is dropped.

use serde::Serialize;
use std::iter;
use tracing::{debug, warn};

use super::sort::SortKey;

/// Cell delimiter inside a LaTeX table row
const CELL_DELIMITER: char = '&';

/// LaTeX row terminator (`\\`)
const ROW_TERMINATOR: &str = "\\\\";

/// Header row plus data rows, all of equal width
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResultsTable {
    /// Column names
    pub header: Vec<String>,

    /// Data rows in table order
    pub rows: Vec<Vec<String>>,
}

impl ResultsTable {
    /// Parse the contents of a LaTeX table fragment.
    ///
    /// The first line containing `&` becomes the header. Data rows are
    /// padded or truncated to the header width so every row has the same
    /// number of cells.
    pub fn parse(content: &str) -> Self {
        let mut lines = content
            .lines()
            .filter(|line| line.contains(CELL_DELIMITER))
            .map(split_row);

        let Some(header) = lines.next() else {
            debug!("No delimited rows found");
            return Self::default();
        };

        let width = header.len();
        let rows = lines
            .enumerate()
            .map(|(index, mut row)| {
                if row.len() != width {
                    warn!(
                        "Row {} has {} cells, header has {}; normalizing",
                        index + 1,
                        row.len(),
                        width
                    );
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        Self { header, rows }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// True when no header row was found
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// Header followed by data rows
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        iter::once(&self.header).chain(self.rows.iter())
    }

    /// Stable sort of data rows, highest score in `column` first.
    ///
    /// Cells that are not numbers order after every numeric cell.
    pub fn sort_descending_by(&mut self, column: usize) {
        if column >= self.width() {
            warn!(
                "Sort column {} out of range for {} columns; keeping table order",
                column,
                self.width()
            );
            return;
        }

        let mut keyed: Vec<(SortKey, Vec<String>)> = self
            .rows
            .drain(..)
            .map(|row| (SortKey::parse(&row[column]), row))
            .collect();

        for (key, row) in &keyed {
            if *key == SortKey::Malformed {
                debug!("Non-numeric score {:?} in row {:?}", row[column], row[0]);
            }
        }

        keyed.sort_by(|a, b| a.0.cmp_descending(&b.0));
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
    }
}

/// Strip the row terminator and split into trimmed cells
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim_end();
    let line = line.strip_suffix(ROW_TERMINATOR).unwrap_or(line).trim();

    line.split(CELL_DELIMITER)
        .map(|cell| cell.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACI_BENCH: &str = r"\begin{table*}[htp]
\resizebox{\textwidth}{!}{
\begin{tabular}{lrr}
\toprule
Model & Jury Score & Other \\
\midrule
gpt-4.1 & 0.62 & x \\
llama-3.2-1b & 0.41 & y \\
llama-3.1-8b & 0.75 & z \\
\bottomrule
\end{tabular}}
\end{table*}
";

    fn names(table: &ResultsTable) -> Vec<&str> {
        table.rows.iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn test_parse_skips_boilerplate() {
        let table = ResultsTable::parse(ACI_BENCH);
        assert_eq!(table.header, vec!["Model", "Jury Score", "Other"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["gpt-4.1", "0.62", "x"]);
    }

    #[test]
    fn test_cells_trimmed_after_split() {
        let table = ResultsTable::parse("  a   &   b  \\\\  \n  c&d\\\\\n");
        assert_eq!(table.header, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["c", "d"]]);
    }

    #[test]
    fn test_parse_empty() {
        let table = ResultsTable::parse("\\begin{tabular}{l}\n\\end{tabular}\n");
        assert!(table.is_empty());
        assert_eq!(table.all_rows().count(), 1);
    }

    #[test]
    fn test_short_and_long_rows_normalized() {
        let table = ResultsTable::parse("A & B & C \\\\\nm1 & 0.5 \\\\\nm2 & 0.4 & x & extra \\\\\n");
        for row in table.all_rows() {
            assert_eq!(row.len(), table.width());
        }
        assert_eq!(table.rows[0], vec!["m1", "0.5", ""]);
        assert_eq!(table.rows[1], vec!["m2", "0.4", "x"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut table = ResultsTable::parse(ACI_BENCH);
        table.sort_descending_by(1);
        assert_eq!(names(&table), vec!["llama-3.1-8b", "gpt-4.1", "llama-3.2-1b"]);
    }

    #[test]
    fn test_sort_numeric_not_lexicographic() {
        let mut table = ResultsTable::parse("M & S \\\\\na & 0.75 \\\\\nb & 0.8 \\\\\nc & 10 \\\\\n");
        table.sort_descending_by(1);
        assert_eq!(names(&table), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut table =
            ResultsTable::parse("M & S \\\\\na & 0.5 \\\\\nb & 0.9 \\\\\nc & 0.5 \\\\\nd & 0.50 \\\\\n");
        table.sort_descending_by(1);
        assert_eq!(names(&table), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_malformed_scores_sort_last() {
        let mut table =
            ResultsTable::parse("M & S \\\\\na & - \\\\\nb & 0.1 \\\\\nc & n/a \\\\\nd & 0.3 \\\\\n");
        table.sort_descending_by(1);
        assert_eq!(names(&table), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_sort_column_out_of_range() {
        let mut table = ResultsTable::parse(ACI_BENCH);
        table.sort_descending_by(7);
        assert_eq!(names(&table), vec!["gpt-4.1", "llama-3.2-1b", "llama-3.1-8b"]);
    }
}
