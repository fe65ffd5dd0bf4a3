//! Command-line interface module.

mod args;
pub mod deploy;

pub use args::Cli;
pub use deploy::{DeployOptions, deploy};

use crate::app::App;
use crate::config::Config;
use crate::remote::{CloudFrontCache, S3Store, load_aws_config};
use crate::{core, log, logger};
use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};

/// Build the host application and run the deploy pipeline.
///
/// `build` is the closure that constructs the app; any error it raises
/// propagates unchanged. CLI parsing happens first, so a usage error exits
/// nonzero before anything else runs.
pub fn run(build: impl FnOnce(&mut App) -> Result<()>) -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    core::setup_shutdown_handler()?;

    let config = Config::load(&cli.config)?;
    let options = DeployOptions {
        extra_routes: config.snapshot.extra_routes,
        default_cache_control: config.snapshot.default_cache_control,
    };

    let mut app = App::new();
    build(&mut app)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let summary = rt.block_on(async {
        let aws = load_aws_config(
            cli.region.or(config.publish.region),
            cli.endpoint.or(config.publish.endpoint),
        )
        .await;
        let store = S3Store::new(&aws, &cli.s3_bucket);
        let cache = CloudFrontCache::new(&aws, &cli.cloudfront_distribution_id);

        deploy(app, &options, &store, &cache).await
    })?;

    log!("publish"; "{summary}");
    Ok(())
}
