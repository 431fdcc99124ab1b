use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use structdiff_diff::KeyMatch;
use structdiff_formats::Format;

#[derive(Parser)]
#[command(
    name = "structdiff",
    about = "Compare structured data files like JSON, YAML, TOML, INI, or CSV",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with default comparison settings
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum KeyMatchArg {
    Exact,
    CaseInsensitive,
}

impl From<KeyMatchArg> for KeyMatch {
    fn from(arg: KeyMatchArg) -> Self {
        match arg {
            KeyMatchArg::Exact => KeyMatch::Exact,
            KeyMatchArg::CaseInsensitive => KeyMatch::CaseInsensitive,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two structured data files
    Compare(CompareArgs),
    /// List supported formats and their file extensions
    Formats,
}

#[derive(Args, Clone, Debug)]
pub struct CompareArgs {
    /// First document: a file path, or `-` for stdin
    pub old: String,
    /// Second document: a file path, or `-` for stdin
    pub new: String,
    /// Only show diffs under this key path (e.g. user.address.city)
    #[arg(short = 'f', long = "filter", value_name = "PATH")]
    pub filters: Vec<String>,
    /// How mapping keys are paired across the two documents
    #[arg(long, value_enum)]
    pub key_match: Option<KeyMatchArg>,
    /// Compare string values case-insensitively
    #[arg(short = 'i', long)]
    pub ignore_case: bool,
    /// Format of both inputs, overriding extension detection
    #[arg(long = "type", value_name = "FORMAT")]
    pub format: Option<Format>,
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
    /// Exit with a non-zero code if differences are found
    #[arg(short, long)]
    pub check: bool,
    /// Only output the summary
    #[arg(short, long)]
    pub quiet: bool,
    /// Largest accepted input in bytes (0 disables the limit)
    #[arg(long, value_name = "BYTES")]
    pub max_size: Option<u64>,
    /// Username for HTTP basic auth on URL inputs
    #[arg(long, value_name = "USER")]
    pub basic_username: Option<String>,
    /// Password for HTTP basic auth; `$NAME` reads an environment variable,
    /// `@PATH` reads a file
    #[arg(long, value_name = "SECRET", requires = "basic_username")]
    pub basic_password: Option<String>,
    /// Bearer token for URL inputs; accepts `$NAME` and `@PATH` like the password
    #[arg(long, value_name = "SECRET", conflicts_with = "basic_username")]
    pub bearer_token: Option<String>,
    /// Extra HTTP header for URL inputs, e.g. X-API-Key=$API_KEY
    #[arg(long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,
    /// Timeout in seconds for each URL input
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}
