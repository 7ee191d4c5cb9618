//! minbundle - regenerate minified, mapped and gzipped front-end artifacts.

mod asset;
mod bundle;
mod cli;
mod config;
mod dispatch;
mod hooks;
mod logger;
mod pipeline;
mod transform;
mod utils;
mod writer;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::MinbundleConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = MinbundleConfig::load(&cli)?;
    debug!("config"; "root {}", config.root.display());

    cli::run(&cli, &config)
}
