//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Snapshot the application and publish changed assets
#[derive(Parser, Debug, Clone)]
#[command(name = "stasis", version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Target S3 bucket name
    #[arg(long = "s3-bucket", value_name = "BUCKET")]
    pub s3_bucket: String,

    /// Target CloudFront distribution id
    #[arg(long = "cloudfront-distribution-id", value_name = "ID")]
    pub cloudfront_distribution_id: String,

    /// AWS region override
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Custom object-store endpoint (e.g. LocalStack)
    #[arg(long, value_hint = clap::ValueHint::Url)]
    pub endpoint: Option<String>,

    /// Config file path (default: stasis.toml)
    #[arg(short = 'C', long, default_value = "stasis.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
