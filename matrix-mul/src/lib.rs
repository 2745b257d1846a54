//! Row-parallel integer matrix multiplication.
//!
//! `matrix-mul` computes C = A × B by running one task per output row on
//! tokio's blocking pool. An admission gate with a fixed number of permits
//! bounds how many rows compute at once; completion of the product is
//! tracked separately, so [`Scheduler::multiply`] returns only after every
//! row has been joined.
//!
//! # Concurrency
//!
//! - A and B are only read during a multiplication.
//! - C is shared by all row tasks but each task writes a single row, and
//!   every row has its own lock, so tasks never wait on each other's writes.
//! - The admission gate and the join set belong to one `multiply` call.
//!
//! Arithmetic is on `i64` and wraps on overflow. The result does not depend
//! on the number of permits.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use matrix_mul::{Matrix, Scheduler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let a = Arc::new(Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]));
//!     let b = Arc::new(Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]));
//!     let c = Arc::new(Matrix::result_for(&a, &b)?);
//!
//!     Scheduler::new(8)?.multiply(a, b, Arc::clone(&c)).await?;
//!
//!     assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
//!     print!("{}", c);
//!     Ok(())
//! }
//! ```

mod error;
pub mod input;
mod matrix;
mod row_task;
mod scheduler;

pub use error::Error;
pub use matrix::{Element, Matrix};
pub use row_task::compute_row;
pub use scheduler::{DEFAULT_PERMITS, Scheduler};
