//! Admission-controlled fan-out of row tasks.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info};

use crate::Error;
use crate::matrix::{Matrix, shape};
use crate::row_task::{RowFn, RowTask, compute_row};

/// Number of rows computed at once when no other capacity is configured.
pub const DEFAULT_PERMITS: usize = 8;

/// Multiplies matrices by running one task per output row.
///
/// At most `permits` rows compute at the same time. A task gives its permit
/// back as soon as its row is done, while completion of the whole product is
/// tracked separately through a [`JoinSet`]. Both are created per call, so
/// one `Scheduler` can serve any number of concurrent multiplications.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use matrix_mul::{Matrix, Scheduler};
///
/// #[tokio::main]
/// async fn main() -> Result<(), matrix_mul::Error> {
///     let a = Arc::new(Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]));
///     let b = Arc::new(Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]));
///
///     let c = Scheduler::new(2)?.product(a, b).await?;
///     assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    permits: usize,
}

impl Scheduler {
    /// Creates a scheduler that computes at most `permits` rows at once.
    pub fn new(permits: usize) -> Result<Self, Error> {
        if permits == 0 {
            return Err(Error::ZeroPermits);
        }
        Ok(Self { permits })
    }

    /// Number of rows allowed to compute at the same time.
    pub fn permits(&self) -> usize {
        self.permits
    }

    /// Computes `c = a × b`.
    ///
    /// `c` must be zero-filled and shaped `rows(a)` × `cols(b)`. Shapes are
    /// checked before any task starts, so on error `c` is untouched. Returns
    /// once every row has been joined.
    ///
    /// # Panics
    ///
    /// Re-raises the panic of a row task that panicked.
    pub async fn multiply(
        &self,
        a: Arc<Matrix>,
        b: Arc<Matrix>,
        c: Arc<Matrix>,
    ) -> Result<(), Error> {
        self.fan_out(a, b, c, Arc::new(compute_row)).await
    }

    async fn fan_out(
        &self,
        a: Arc<Matrix>,
        b: Arc<Matrix>,
        c: Arc<Matrix>,
        compute: RowFn,
    ) -> Result<(), Error> {
        let (m, n) = a.dimensions();
        let (b_n, p) = b.dimensions();
        if n != b_n {
            return Err(Error::DimensionMismatch(m, n, b_n, p));
        }

        let (rows, cols) = shape(m, p);
        let (found_rows, found_cols) = c.dimensions();
        if (found_rows, found_cols) != (rows, cols) {
            return Err(Error::ResultShape {
                rows,
                cols,
                found_rows,
                found_cols,
            });
        }

        if m == 0 || p == 0 {
            return Ok(());
        }

        let started = Instant::now();
        let gate = Arc::new(Semaphore::new(self.permits));
        let mut tasks = JoinSet::new();

        for i in 0..m {
            let permit = Arc::clone(&gate).acquire_owned().await?;
            debug!(row = i, "row admitted");

            let task = RowTask::new(
                Arc::clone(&a),
                Arc::clone(&b),
                Arc::clone(&c),
                i,
                permit,
                Arc::clone(&compute),
            );
            tasks.spawn_blocking(move || task.run());
        }

        while let Some(joined) = tasks.join_next().await {
            check_joined(joined)?;
        }

        info!(
            m,
            n,
            p,
            permits = self.permits,
            elapsed_us = started.elapsed().as_micros() as u64,
            "multiplication complete"
        );

        Ok(())
    }

    /// Validates shapes, allocates the result and multiplies.
    pub async fn product(&self, a: Arc<Matrix>, b: Arc<Matrix>) -> Result<Matrix, Error> {
        let c = Arc::new(Matrix::result_for(&a, &b)?);
        self.multiply(a, b, Arc::clone(&c)).await?;

        Ok(Arc::try_unwrap(c).unwrap_or_else(|shared| (*shared).clone()))
    }
}

/// Unwraps a joined row, re-raising its panic. A row that was cancelled
/// instead of finishing is an error.
fn check_joined(joined: Result<usize, JoinError>) -> Result<usize, Error> {
    match joined {
        Ok(row) => Ok(row),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(Error::RowCancelled(e)),
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            permits: DEFAULT_PERMITS,
        }
    }
}
