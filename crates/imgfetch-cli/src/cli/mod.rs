//! CLI for the imgfetch image fetcher.

mod commands;
mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgfetch_core::config;
use std::path::PathBuf;

use commands::{run_config, run_fetch, FetchArgs};

/// Top-level CLI for imgfetch.
#[derive(Debug, Parser)]
#[command(name = "imgfetch")]
#[command(about = "imgfetch: fetch images over HTTP(S), skipping duplicates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch image URLs into the output directory.
    Fetch {
        /// Image URLs. An argument may hold several URLs separated by commas.
        urls: Vec<String>,

        /// Read more URLs from a file, one per line (commas also accepted). `-` reads stdin.
        #[arg(long, short = 'i', value_name = "FILE")]
        input: Option<PathBuf>,

        /// Save into DIR instead of the configured output directory.
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Exit with status 2 if any URL failed.
        #[arg(long)]
        strict: bool,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    /// Parses arguments, runs the command, and returns the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                urls,
                input,
                output_dir,
                strict,
            } => run_fetch(
                &cfg,
                FetchArgs {
                    urls,
                    input,
                    output_dir,
                    strict,
                },
            ),
            CliCommand::Config => {
                run_config(&cfg)?;
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests;
