//! eda-cli binary entry point.

use anyhow::Result;
use clap::Parser;
use term_eda_cli::{execute, init_tracing, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let output = execute(&cli).await?;
    print!("{output}");
    Ok(())
}
