//! Command-line configuration for the runner.

use std::num::ParseIntError;
use std::path::PathBuf;

use matrix_mul::DEFAULT_PERMITS;
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "input.txt";
pub const PERMITS_ENV: &str = "MATMUL_PERMITS";

const DEFAULT_BENCH_SIZE: usize = 256;
const DEFAULT_BENCH_ITERATIONS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("bench needs at least one row in A")]
    EmptyBench,

    #[error("invalid value for {name}: {source}")]
    InvalidNumber {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Multiply the pair of matrices in `input` and print the product.
    Run { input: PathBuf, permits: usize },
    /// Multiply random `m`×`n` and `n`×`p` matrices `iterations` times.
    Bench {
        m: usize,
        n: usize,
        p: usize,
        iterations: usize,
        permits: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
}

impl Config {
    /// Builds a config from `args` (program name first) and the value of
    /// the permits environment variable, if set.
    ///
    /// A permits argument wins over the environment, which wins over
    /// [`DEFAULT_PERMITS`].
    pub fn from_args(args: &[String], env_permits: Option<&str>) -> Result<Self, ConfigError> {
        let default_permits = match env_permits {
            Some(value) => parse(PERMITS_ENV, value)?,
            None => DEFAULT_PERMITS,
        };

        let mode = args.get(1).map(String::as_str).unwrap_or("run");

        let mode = match mode {
            "run" => Mode::Run {
                input: args
                    .get(2)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
                permits: arg_or(args, 3, "permits", default_permits)?,
            },
            "bench" => Mode::Bench {
                m: arg_or(args, 2, "m", DEFAULT_BENCH_SIZE)?,
                n: arg_or(args, 3, "n", DEFAULT_BENCH_SIZE)?,
                p: arg_or(args, 4, "p", DEFAULT_BENCH_SIZE)?,
                iterations: arg_or(args, 5, "iterations", DEFAULT_BENCH_ITERATIONS)?,
                permits: arg_or(args, 6, "permits", default_permits)?,
            },
            other => return Err(ConfigError::UnknownMode(other.to_string())),
        };

        // A zero-row matrix has zero columns, which no n > 0 B can match.
        if let Mode::Bench { m: 0, .. } = mode {
            return Err(ConfigError::EmptyBench);
        }

        Ok(Self { mode })
    }
}

fn arg_or(
    args: &[String],
    idx: usize,
    name: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    match args.get(idx) {
        Some(value) => parse(name, value),
        None => Ok(default),
    }
}

fn parse(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumber { name, source })
}
