//! LDBC SNB validation generator command-line interface.
//!
//! Usage:
//!   ldbc-snb-validation-generator path/to/config.json

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use validation_generator::config::GeneratorConfig;

const USAGE: &str = "Missing config path argument.
Usage:
  ldbc-snb-validation-generator path/to/config.json";

#[derive(Parser, Debug)]
#[command(name = "ldbc-snb-validation-generator")]
#[command(about = "Generate SPARQL validation queries and expected results from LDBC SNB validation parameters")]
#[command(disable_help_flag = true)]
struct Args {
    /// Path to the JSON configuration file. Every argument counts, flags included.
    #[arg(value_name = "CONFIG", allow_hyphen_values = true, trailing_var_arg = true)]
    configs: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let [config_path] = args.configs.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::SUCCESS;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config_path: &Path) -> validation_generator::Result<()> {
    let config = GeneratorConfig::load(config_path).await?;
    config.build().generate().await?;
    Ok(())
}
