use clap::Parser;
use tracing_subscriber::EnvFilter;

use matmul_runner::config::{Cli, Command};
use matmul_runner::runner;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the report line only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Multiply(args) => {
            let report = runner::run_multiply(&args).await?;
            println!("{}", report);
        }
        Command::Generate(args) => {
            runner::run_generate(&args).await?;
        }
    }

    Ok(())
}
