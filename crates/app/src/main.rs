use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

/// Extract lab values from a scanned blood report into a CSV.
#[derive(Debug, Parser)]
#[command(
    version,
    after_help = r#"
Environment Variables:
  - RUST_LOG (optional): log filter, defaults to "info".

Without --config, settings are read from labscan.toml in the user
config directory when that file exists.
"#
)]
pub struct Opts {
    /// Report image (PNG, JPEG, …).
    #[arg(required_unless_present = "text")]
    pub image: Option<PathBuf>,

    /// CSV file to write. Overrides `output.path` from the config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read already-recognized text from this file instead of running OCR.
    #[arg(long, value_name = "PATH")]
    pub text: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    commands::run(&opts)
}
