use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use matrix_mul::{Matrix, Scheduler, input};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{Config, ConfigError, Mode, PERMITS_ENV};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let env_permits = env::var(PERMITS_ENV).ok();

    let config = match Config::from_args(&args, env_permits.as_deref()) {
        Ok(config) => config,
        Err(ConfigError::UnknownMode(mode)) => {
            eprintln!("Unknown mode: {}", mode);
            eprintln!("Usage: {} <mode> [args...]", args[0]);
            eprintln!("Modes:");
            eprintln!("  run [input] [permits]                  - Multiply the matrices in input (default input.txt)");
            eprintln!("  bench [m] [n] [p] [iterations] [permits] - Time random m×n by n×p products");
            eprintln!("Set {} to change the default number of permits.", PERMITS_ENV);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    match config.mode {
        Mode::Run { input, permits } => {
            let scheduler = Scheduler::new(permits)?;
            info!(input = %input.display(), permits, "reading input");

            let (a, b) = input::read_input(&input).await?;
            let c = scheduler.product(Arc::new(a), Arc::new(b)).await?;

            print!("{}", c);
        }
        Mode::Bench {
            m,
            n,
            p,
            iterations,
            permits,
        } => {
            let scheduler = Scheduler::new(permits)?;

            let mut rng = rand::thread_rng();
            let a = Arc::new(Matrix::random(m, n, &mut rng));
            let b = Arc::new(Matrix::random(n, p, &mut rng));

            println!(
                "Benchmarking {}x{} by {}x{} with {} permits, {} iterations",
                m, n, n, p, permits, iterations
            );

            let mut total = Duration::ZERO;
            for iteration in 0..iterations {
                let started = Instant::now();
                scheduler.product(Arc::clone(&a), Arc::clone(&b)).await?;
                let elapsed = started.elapsed();
                total += elapsed;
                info!(iteration, elapsed_ms = elapsed.as_secs_f64() * 1e3, "iteration done");
            }

            if let Some(mean) = mean(total, iterations) {
                println!("Mean: {:.3} ms", mean.as_secs_f64() * 1e3);
            }
        }
    }

    Ok(())
}

/// Mean duration per iteration, `None` when nothing ran.
fn mean(total: Duration, iterations: usize) -> Option<Duration> {
    if iterations == 0 {
        return None;
    }
    let nanos = total.as_nanos() / iterations as u128;
    Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
}
