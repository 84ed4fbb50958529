//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{GroupsCommand, LoadCommand, PostingsCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Load social-network groups and their postings into a local database
#[derive(Debug, Parser, Clone)]
#[command(name = "group-loader")]
#[command(author = "Group Loader Contributors")]
#[command(version)]
#[command(about = "Loads groups and their postings from a group page URL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to loader configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the sqlite database (overrides the config file)
    #[arg(long, global = true, env = "GROUP_LOADER_DB")]
    pub database: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Load a group from its page URL
    Load(LoadCommand),

    /// List stored groups
    Groups(GroupsCommand),

    /// Show the postings of a stored group
    Postings(PostingsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
