use std::fs;

use anyhow::{bail, Context};

/// Resolve a credential given on the command line.
///
/// `$NAME` reads the environment variable `NAME`, `@PATH` (or `@file:PATH`)
/// reads a file and trims surrounding whitespace, anything else is literal.
pub fn resolve_secret(raw: &str) -> anyhow::Result<String> {
    resolve_with(raw, |name| std::env::var(name).ok())
}

fn resolve_with(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    if let Some(name) = raw.strip_prefix('$') {
        return lookup(name).with_context(|| format!("environment variable {name} is not set"));
    }
    if let Some(path) = raw.strip_prefix('@') {
        let path = path.strip_prefix("file:").unwrap_or(path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read secret file {path}"))?;
        return Ok(content.trim().to_string());
    }
    Ok(raw.to_string())
}

/// Split `NAME=VALUE` and resolve the value like a secret. A bare `NAME`
/// sends an empty value.
pub fn parse_header(raw: &str) -> anyhow::Result<(String, String)> {
    parse_header_with(raw, |name| std::env::var(name).ok())
}

fn parse_header_with(
    raw: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<(String, String)> {
    let (name, value) = raw.split_once('=').unwrap_or((raw, ""));
    let name = name.trim();
    if name.is_empty() {
        bail!("header {raw:?} has no name");
    }
    let value = resolve_with(value, lookup)
        .with_context(|| format!("invalid value for header {name}"))?;
    Ok((name.to_string(), value))
}
