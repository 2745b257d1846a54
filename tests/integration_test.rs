use std::sync::Arc;

use matrix_mul::{Element, Error, Matrix, Scheduler, input};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn reference_product(a: &[Vec<Element>], b: &[Vec<Element>]) -> Vec<Vec<Element>> {
    let p = b.first().map_or(0, Vec::len);
    a.iter()
        .map(|row| {
            (0..p)
                .map(|j| {
                    row.iter()
                        .zip(b)
                        .fold(0 as Element, |acc, (x, b_row)| {
                            acc.wrapping_add(x.wrapping_mul(b_row[j]))
                        })
                })
                .collect()
        })
        .collect()
}

async fn multiply_with(permits: usize, a: &Arc<Matrix>, b: &Arc<Matrix>) -> Matrix {
    Scheduler::new(permits)
        .unwrap()
        .product(Arc::clone(a), Arc::clone(b))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_by_two() {
    let a = Arc::new(Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]));
    let b = Arc::new(Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]));

    let sequential = multiply_with(1, &a, &b).await;
    let parallel = multiply_with(8, &a, &b).await;

    assert_eq!(sequential.to_rows(), vec![vec![19, 22], vec![43, 50]]);
    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn test_row_times_column() {
    let a = Arc::new(Matrix::from_rows(vec![vec![1, 1, 1]]));
    let b = Arc::new(Matrix::from_rows(vec![vec![2], vec![3], vec![4]]));

    let c = multiply_with(8, &a, &b).await;

    assert_eq!(c.to_rows(), vec![vec![9]]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_random_matches_reference_for_every_capacity() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..5 {
        let m = rng.gen_range(1..24);
        let n = rng.gen_range(1..24);
        let p = rng.gen_range(1..24);
        let a = Arc::new(Matrix::random(m, n, &mut rng));
        let b = Arc::new(Matrix::random(n, p, &mut rng));
        let expected = reference_product(&a.to_rows(), &b.to_rows());

        for permits in [1, 2, 3, m, m + 5] {
            let c = multiply_with(permits, &a, &b).await;
            assert_eq!(c.dimensions(), (m, p));
            assert_eq!(c.to_rows(), expected, "permits = {}", permits);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_inputs_unchanged_and_repeatable() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = Arc::new(Matrix::random(10, 6, &mut rng));
    let b = Arc::new(Matrix::random(6, 9, &mut rng));
    let a_before = a.to_rows();
    let b_before = b.to_rows();

    let first = multiply_with(4, &a, &b).await;
    let second = multiply_with(4, &a, &b).await;

    assert_eq!(first, second);
    assert_eq!(a.to_rows(), a_before);
    assert_eq!(b.to_rows(), b_before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_multiplications_share_a_scheduler() {
    let scheduler = Scheduler::new(2).unwrap();
    let a = Arc::new(Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]));
    let b = Arc::new(Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]));
    let identity = Arc::new(Matrix::from_rows(vec![vec![1, 0], vec![0, 1]]));

    let (left, right) = tokio::join!(
        scheduler.product(Arc::clone(&a), Arc::clone(&b)),
        scheduler.product(Arc::clone(&a), Arc::clone(&identity)),
    );

    assert_eq!(left.unwrap().to_rows(), vec![vec![19, 22], vec![43, 50]]);
    assert_eq!(right.unwrap().to_rows(), a.to_rows());
}

#[tokio::test]
async fn test_dimension_mismatch_before_any_work() {
    let a = Arc::new(Matrix::zeros(2, 3));
    let b = Arc::new(Matrix::zeros(2, 2));

    let err = Scheduler::default().product(a, b).await.unwrap_err();

    assert!(matches!(err, Error::DimensionMismatch(2, 3, 2, 2)));
}

#[tokio::test]
async fn test_empty_operands() {
    let a = Arc::new(Matrix::from_rows(Vec::new()));
    let b = Arc::new(Matrix::from_rows(Vec::new()));
    let c = multiply_with(3, &a, &b).await;
    assert_eq!(c.dimensions(), (0, 0));
    assert_eq!(c.to_string(), "");
}

#[tokio::test]
async fn test_overflow_wraps() {
    let a = Arc::new(Matrix::from_rows(vec![vec![Element::MAX, Element::MAX]]));
    let b = Arc::new(Matrix::from_rows(vec![vec![1], vec![1]]));

    let c = multiply_with(1, &a, &b).await;

    assert_eq!(c.read(0, 0), Element::MAX.wrapping_add(Element::MAX));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parse_multiply_print() {
    let (a, b) = input::parse_input("1 2\n3 4\n\n5 6\n7 8\n").unwrap();

    let c = Scheduler::default()
        .product(Arc::new(a), Arc::new(b))
        .await
        .unwrap();

    assert_eq!(c.to_string(), "19 22 \n43 50 \n");
}
