//! Thread-safe integer matrix with per-row locking.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;

use crate::Error;

/// Element type of every matrix. Arithmetic on it wraps on overflow.
pub type Element = i64;

/// A rectangular integer matrix that can be mutated through a shared reference.
///
/// Each row sits behind its own `RwLock`, so concurrent writers to distinct
/// rows never wait on each other, and readers of one row never block writers
/// of another. The shape is fixed at construction.
///
/// Indexing outside `0..rows` × `0..cols` panics; use [`Matrix::get`] for a
/// checked read.
#[derive(Debug)]
pub struct Matrix {
    rows: Vec<RwLock<Vec<Element>>>,
    cols: usize,
}

impl Matrix {
    /// Builds a matrix from row vectors.
    ///
    /// All rows must have the same length. This is not checked in release
    /// builds; [`crate::input::parse_input`] rejects jagged input before a
    /// matrix is ever built from it.
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        debug_assert!(
            rows.iter().all(|row| row.len() == cols),
            "matrix rows must all have {cols} columns"
        );

        Self {
            rows: rows.into_iter().map(RwLock::new).collect(),
            cols,
        }
    }

    /// Builds a zero-filled `rows` × `cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let (rows, cols) = shape(rows, cols);
        Self {
            rows: (0..rows).map(|_| RwLock::new(vec![0; cols])).collect(),
            cols,
        }
    }

    /// Builds a matrix with entries drawn uniformly from `-100..=100`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let (rows, cols) = shape(rows, cols);
        Self {
            rows: (0..rows)
                .map(|_| RwLock::new((0..cols).map(|_| rng.gen_range(-100..=100)).collect()))
                .collect(),
            cols,
        }
    }

    /// Allocates the zero-filled result of `a × b`.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the column count of `a`
    /// differs from the row count of `b`.
    pub fn result_for(a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
        let (m, n) = a.dimensions();
        let (b_n, p) = b.dimensions();

        if n != b_n {
            return Err(Error::DimensionMismatch(m, n, b_n, p));
        }

        Ok(Matrix::zeros(m, p))
    }

    /// Returns `(rows, cols)`. A matrix without rows has zero columns.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    /// Returns the element at `(i, j)`.
    pub fn read(&self, i: usize, j: usize) -> Element {
        self.row(i)[j]
    }

    /// Overwrites the element at `(i, j)`.
    pub fn write(&self, i: usize, j: usize, value: Element) {
        self.row_mut(i)[j] = value;
    }

    /// Adds `delta` to the cell at `(i, j)` under the row's write lock,
    /// wrapping on overflow.
    pub fn increment(&self, i: usize, j: usize, delta: Element) {
        let mut row = self.row_mut(i);
        let cell = &mut row[j];
        *cell = cell.wrapping_add(delta);
    }

    /// Checked read. Returns `None` outside the matrix.
    pub fn get(&self, i: usize, j: usize) -> Option<Element> {
        let row = self.rows.get(i)?;
        let guard = row.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(j).copied()
    }

    /// Copies the current contents out as row vectors.
    pub fn to_rows(&self) -> Vec<Vec<Element>> {
        (0..self.rows.len()).map(|i| self.row(i).clone()).collect()
    }

    // Cells carry no invariant a panicking writer could break.
    fn row(&self, i: usize) -> RwLockReadGuard<'_, Vec<Element>> {
        self.rows[i].read().unwrap_or_else(PoisonError::into_inner)
    }

    fn row_mut(&self, i: usize) -> RwLockWriteGuard<'_, Vec<Element>> {
        self.rows[i].write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shape of a `rows` × `cols` matrix; no rows means no columns.
pub(crate) fn shape(rows: usize, cols: usize) -> (usize, usize) {
    if rows == 0 { (0, 0) } else { (rows, cols) }
}

impl From<Vec<Vec<Element>>> for Matrix {
    fn from(rows: Vec<Vec<Element>>) -> Self {
        Self::from_rows(rows)
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        Self::from_rows(self.to_rows())
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.to_rows() == other.to_rows()
    }
}

impl Eq for Matrix {}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows.len() {
            for value in self.row(i).iter() {
                write!(f, "{} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
