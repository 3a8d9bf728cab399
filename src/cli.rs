// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dashgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dashgraph",
    version,
    about = "Keep a dashboard configuration graph live-reloaded from its config files.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory the default layout is rooted at.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Path to the layout file (TOML).
    ///
    /// Default: `Dashgraph.toml` inside `--root`; defaults are used if it
    /// does not exist.
    #[arg(long, value_name = "PATH")]
    pub layout: Option<PathBuf>,

    /// Build once, print the resulting configuration, and exit.
    #[arg(long)]
    pub once: bool,

    /// Print the resolved layout without loading anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DASHGRAPH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// The layout file to read.
    pub fn layout_path(&self) -> PathBuf {
        self.layout
            .clone()
            .unwrap_or_else(|| self.root.join(crate::config::DEFAULT_LAYOUT_FILE))
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
