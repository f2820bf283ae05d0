//! CLI for the mfetch parallel fetcher.

mod commands;
mod report;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mfetch_core::config;
use std::path::PathBuf;

use commands::{run_check, run_config, run_fetch};

/// Top-level CLI for mfetch.
#[derive(Debug, Parser)]
#[command(name = "mfetch")]
#[command(
    about = "mfetch: fetch many URLs in parallel with a per-transfer size cap",
    long_about = None
)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/mfetch/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch URLs and print one line per result.
    Fetch(FetchArgs),

    /// Check that libcurl is available with HTTP support.
    Check,

    /// Show the config file location and effective settings.
    Config,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// HTTP/HTTPS URLs to fetch.
    pub urls: Vec<String>,

    /// Also read URLs from FILE, one per line ('#' starts a comment).
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Maximum number of transfers in flight (default from config, 10).
    #[arg(long, value_name = "N")]
    pub max_sessions: Option<usize>,

    /// Stop each transfer after this many bytes (default from config, 10 MiB).
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<u64>,

    /// Extra request header, e.g. -H 'Accept: text/html'. Replaces the default header set.
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// User-Agent to send.
    #[arg(long, short = 'A', value_name = "UA")]
    pub user_agent: Option<String>,

    /// Overall timeout per transfer in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not follow redirects.
    #[arg(long)]
    pub no_follow: bool,

    /// Prepend response headers to each body.
    #[arg(long)]
    pub include_headers: bool,

    /// Print one JSON object per result.
    #[arg(long)]
    pub json: bool,

    /// Print the SHA-256 of each body.
    #[arg(long)]
    pub checksum: bool,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch(args) => run_fetch(&cfg, &args)?,
            CliCommand::Check => run_check()?,
            CliCommand::Config => run_config(cli.config.as_deref(), &cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
