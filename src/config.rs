use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "matmul-runner",
    version = env!("CARGO_PKG_VERSION"),
    about = "Multiply binary matrix files on a fixed number of worker threads."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    // verbosity (-v, -vv), overridden by RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Multiply A by B and write the product, printing phase timings
    Multiply(MultiplyArgs),
    /// Write a matrix of uniformly random values
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct MultiplyArgs {
    /// Left-hand matrix file
    #[arg(value_name = "A", value_hint = clap::ValueHint::FilePath)]
    pub matrix_a: PathBuf,

    /// Right-hand matrix file
    #[arg(value_name = "B", value_hint = clap::ValueHint::FilePath)]
    pub matrix_b: PathBuf,

    /// Where to write the product
    #[arg(value_name = "OUT", value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Number of worker threads
    #[arg(value_name = "WORKERS", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub workers: usize,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_parser = dimension_parser())]
    pub rows: usize,

    #[arg(value_parser = dimension_parser())]
    pub cols: usize,

    #[arg(value_name = "OUT", value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Seed for the random generator
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Lower bound of generated values (inclusive)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub min: f32,

    /// Upper bound of generated values (exclusive)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub max: f32,
}

// Dimensions are stored as int32 in the file header.
fn dimension_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..=i32::MAX as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiply() {
        let cli = Cli::parse_from(["matmul-runner", "multiply", "a.bin", "b.bin", "c.bin", "4"]);
        match cli.command {
            Command::Multiply(args) => {
                assert_eq!(args.matrix_a, PathBuf::from("a.bin"));
                assert_eq!(args.output, PathBuf::from("c.bin"));
                assert_eq!(args.workers, 4);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        let res = Cli::try_parse_from(["matmul-runner", "multiply", "a", "b", "c", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_generate_with_negative_bounds() {
        let cli = Cli::try_parse_from([
            "matmul-runner",
            "generate",
            "3",
            "5",
            "m.bin",
            "--seed",
            "7",
            "--min",
            "-4",
            "--max",
            "-2",
        ])
        .unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!((args.rows, args.cols, args.seed), (3, 5, 7));
                assert_eq!((args.min, args.max), (-4.0, -2.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
