//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Regenerate minified front-end artifacts
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: minbundle.toml)
    #[arg(short = 'C', long, global = true, default_value = "minbundle.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Never run two jobs for the same output path at once
    #[arg(long, global = true)]
    pub exclusive: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Process every bundle of a bundle definition file
    #[command(visible_alias = "b")]
    Bundle {
        /// Bundle definition file (default: `pipeline.bundle_file`)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        definition: Option<PathBuf>,
    },

    /// Reprocess the bundles that consume a changed source file
    #[command(visible_alias = "c")]
    Changed {
        /// Bundle definition file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        definition: PathBuf,

        /// The source file that changed
        #[arg(value_hint = clap::ValueHint::FilePath)]
        source: PathBuf,
    },

    /// Minify individual source files
    #[command(visible_alias = "m")]
    Minify {
        /// Script, stylesheet or markup files
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },

    /// List the bundles that produce an output file
    #[command(visible_alias = "o")]
    Outputs {
        /// Bundle definition file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        definition: PathBuf,

        /// Output file to look up
        #[arg(value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,
    },
}
