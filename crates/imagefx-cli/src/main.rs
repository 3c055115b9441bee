//! imagefx CLI
//!
//! Runs one upload through a session and writes the requested effects next to
//! each other, using the same file names the web page offers for download.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = cli::Args::parse();
    info!("imagefx v{}", env!("CARGO_PKG_VERSION"));

    let written = cli::run(&args)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
