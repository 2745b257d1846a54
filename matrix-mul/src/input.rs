//! Plain-text matrix input.
//!
//! An input holds two matrices, A then B. Each matrix row is one line of
//! whitespace-separated integers, and a blank line ends a matrix:
//!
//! ```text
//! 1 2
//! 3 4
//!
//! 5 6
//! 7 8
//! ```
//!
//! End of input also ends a matrix, so a missing B reads as an empty matrix.
//! Anything after the blank line that ends B is ignored.

use std::path::Path;

use tracing::warn;

use crate::Error;
use crate::matrix::{Element, Matrix};

/// Parses one line of whitespace-separated integers.
///
/// `line` is the 1-based line number used in error reports.
pub fn parse_row(text: &str, line: usize) -> Result<Vec<Element>, Error> {
    text.split_whitespace()
        .map(|cell| cell.parse::<Element>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| {
            warn!(line, "rejecting unparsable row");
            Error::Parse { line, source }
        })
}

/// Parses A and B from the text format described in the module docs.
pub fn parse_input(text: &str) -> Result<(Matrix, Matrix), Error> {
    let mut lines = text.lines().enumerate().map(|(idx, l)| (idx + 1, l));

    let a = read_matrix(&mut lines)?;
    let b = read_matrix(&mut lines)?;

    Ok((a, b))
}

/// Reads and parses an input file.
pub async fn read_input(path: impl AsRef<Path>) -> Result<(Matrix, Matrix), Error> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_input(&text)
}

fn read_matrix<'a, I>(lines: &mut I) -> Result<Matrix, Error>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut rows: Vec<Vec<Element>> = Vec::new();

    for (line, text) in lines {
        if text.trim().is_empty() {
            break;
        }

        let row = parse_row(text, line)?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                warn!(line, expected = first.len(), found = row.len(), "rejecting jagged row");
                return Err(Error::JaggedRow {
                    line,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    Ok(Matrix::from_rows(rows))
}
