use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use structdiff_diff::{DiffOptions, KeyMatch, PathFilter};
use structdiff_formats::{RemoteOptions, SourceLoader, DEFAULT_MAX_SIZE, DEFAULT_TIMEOUT};

use crate::cli::CompareArgs;
use crate::secret::{parse_header, resolve_secret};

/// Defaults for `compare`, loaded from a TOML file.
///
/// ```toml
/// filters = ["server.tls"]
/// key_match = "case-insensitive"
/// ignore_case = false
/// max_size = 1048576
/// timeout_secs = 10
/// color = true
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path prefixes always applied, in addition to `--filter`.
    pub filters: Vec<String>,
    pub key_match: KeyMatch,
    /// Compare string values case-insensitively.
    pub ignore_case: bool,
    /// Largest accepted input in bytes; zero disables the limit.
    pub max_size: u64,
    /// Timeout for each URL input, in seconds.
    pub timeout_secs: u64,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            key_match: KeyMatch::Exact,
            ignore_case: false,
            max_size: DEFAULT_MAX_SIZE,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            color: true,
        }
    }
}

/// Effective settings for one `compare` run.
#[derive(Clone, Debug)]
pub struct CompareSettings {
    pub options: DiffOptions,
    pub loader: SourceLoader,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Combine file defaults with command-line flags. Flags win; filters from
    /// both sources are combined.
    pub fn resolve(&self, args: &CompareArgs) -> anyhow::Result<CompareSettings> {
        let filter = PathFilter::parse(self.filters.iter().chain(&args.filters))
            .context("invalid filter path")?;

        let options = DiffOptions::new()
            .with_filter(filter)
            .with_key_match(args.key_match.map_or(self.key_match, KeyMatch::from))
            .ignore_value_case(self.ignore_case || args.ignore_case);

        let loader = SourceLoader::new(args.max_size.unwrap_or(self.max_size))
            .with_remote(self.remote_options(args)?);

        Ok(CompareSettings { options, loader })
    }

    fn remote_options(&self, args: &CompareArgs) -> anyhow::Result<RemoteOptions> {
        let timeout = Duration::from_secs(args.timeout.unwrap_or(self.timeout_secs));
        let mut remote = RemoteOptions::new().with_timeout(timeout);

        if let Some(username) = &args.basic_username {
            let password = args
                .basic_password
                .as_deref()
                .map(resolve_secret)
                .transpose()
                .context("invalid --basic-password")?;
            remote = remote.with_basic_auth(username.as_str(), password);
        }
        if let Some(token) = &args.bearer_token {
            remote = remote.with_bearer_token(resolve_secret(token).context("invalid --bearer-token")?);
        }
        for header in &args.headers {
            let (name, value) = parse_header(header)?;
            remote = remote.with_header(name, value);
        }
        Ok(remote)
    }

    /// Whether output is colored, given the `--no-color` flag.
    pub fn use_color(&self, no_color: bool) -> bool {
        self.color && !no_color
    }
}
