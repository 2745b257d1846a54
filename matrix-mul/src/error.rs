//! Error types for matrix-mul operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("result matrix is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    ResultShape {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("admission gate needs at least one permit")]
    ZeroPermits,

    #[error("admission gate closed: {0}")]
    Admission(#[from] tokio::sync::AcquireError),

    #[error("row task did not complete: {0}")]
    RowCancelled(#[source] tokio::task::JoinError),

    #[error("parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("jagged row on line {line}: expected {expected} columns, found {found}")]
    JaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
