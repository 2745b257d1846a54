//! Computation of a single output row.

use std::sync::Arc;

use tokio::sync::OwnedSemaphorePermit;
use tracing::debug;

use crate::matrix::Matrix;

/// Fills row `i` of `c` with the dot products of row `i` of `a` and each
/// column of `b`.
///
/// `c` must be zero in row `i` beforehand, since values are accumulated into
/// it. Products and sums wrap on overflow.
pub fn compute_row(a: &Matrix, b: &Matrix, c: &Matrix, i: usize) {
    let (_, n) = a.dimensions();
    let (_, p) = b.dimensions();

    for j in 0..p {
        for k in 0..n {
            let a_ik = a.read(i, k);
            let b_kj = b.read(k, j);
            c.increment(i, j, a_ik.wrapping_mul(b_kj));
        }
    }
}

/// Row computation run by each task; [`compute_row`] outside of tests.
pub type RowFn = Arc<dyn Fn(&Matrix, &Matrix, &Matrix, usize) + Send + Sync>;

/// A row of work handed to the blocking pool, together with the admission
/// permit it holds while running.
pub struct RowTask {
    a: Arc<Matrix>,
    b: Arc<Matrix>,
    c: Arc<Matrix>,
    row: usize,
    permit: OwnedSemaphorePermit,
    compute: RowFn,
}

impl RowTask {
    /// Creates the task for `row`, holding `permit` until the row is done.
    pub fn new(
        a: Arc<Matrix>,
        b: Arc<Matrix>,
        c: Arc<Matrix>,
        row: usize,
        permit: OwnedSemaphorePermit,
        compute: RowFn,
    ) -> Self {
        Self {
            a,
            b,
            c,
            row,
            permit,
            compute,
        }
    }

    /// Computes the row, then gives the permit back before the task is joined.
    pub fn run(self) -> usize {
        (self.compute)(&self.a, &self.b, &self.c, self.row);
        drop(self.permit);
        debug!(row = self.row, "row finished");
        self.row
    }
}
