use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use virtdev::cli::handlers::run;
use virtdev::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
