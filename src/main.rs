use anyhow::Result;
use clap::Parser;
use tracing::error;

use postlens::pipeline::{print_summary, run};
use postlens::utils::{setup_logging, validate_args};
use postlens::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    validate_args(&args)?;

    match run(&args) {
        Ok(summary) => {
            print_summary(&summary, &args);
            Ok(())
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run failed");
            std::process::exit(1);
        }
    }
}
