use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use structdiff_diff::{diff, DiffResult};
use structdiff_formats::{Format, FormatError, SourceLoader, STDIN};
use structdiff_types::Value;
use tracing::debug;

use crate::cli::*;
use crate::config::Config;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let color = config.use_color(cli.no_color);
    if !color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Compare(args) => cmd_compare(&args, &config, color),
        Command::Formats => {
            cmd_formats();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_formats() {
    println!("{}", "Supported formats:".bold());
    for format in Format::ALL {
        let extensions: Vec<String> = format
            .extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!("  {:<6} {}", format.name().cyan(), extensions.join(", "));
    }
}

fn cmd_compare(args: &CompareArgs, config: &Config, color: bool) -> anyhow::Result<ExitCode> {
    let result = run_compare(args, config)?;

    let output = match (args.output, args.quiet) {
        (OutputFormat::Text, false) => render::render_text(&result, color),
        (OutputFormat::Text, true) => render::summary_line(result.counts()),
        (OutputFormat::Json, false) => render::render_json(&result)?,
        (OutputFormat::Json, true) => render::render_json_summary(&result)?,
    };
    println!("{}", output.trim_end());

    if fails_check(args, &result) {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn fails_check(args: &CompareArgs, result: &DiffResult) -> bool {
    args.check && !result.is_empty()
}

/// Load both documents and diff them with the resolved settings.
fn run_compare(args: &CompareArgs, config: &Config) -> anyhow::Result<DiffResult> {
    if args.old == STDIN && args.new == STDIN {
        bail!("only one input can be read from stdin");
    }

    let settings = config.resolve(args)?;
    let old = load(&settings.loader, &args.old, args.format)
        .with_context(|| format!("failed to load first document {}", args.old))?;
    let new = load(&settings.loader, &args.new, args.format)
        .with_context(|| format!("failed to load second document {}", args.new))?;

    let result = diff(&old, &new, &settings.options);
    debug!(
        old = %args.old,
        new = %args.new,
        differences = result.len(),
        "compare finished"
    );
    Ok(result)
}

fn load(loader: &SourceLoader, source: &str, format: Option<Format>) -> anyhow::Result<Value> {
    loader.load(source, format).map_err(with_help)
}

fn with_help(err: FormatError) -> anyhow::Error {
    match err.help() {
        Some(help) => anyhow::anyhow!("{err}\n\n{help}"),
        None => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use structdiff_diff::DiffKind;

    fn temp_with(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(old: &str, new: &str, extra: &[&str]) -> CompareArgs {
        let argv = ["structdiff", "compare", old, new]
            .into_iter()
            .chain(extra.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Compare(args) => args,
            Command::Formats => panic!("wrong command"),
        }
    }

    fn path_of(file: &tempfile::NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[test]
    fn compare_json_files() {
        let a = temp_with(".json", r#"{"name": "svc", "port": 80, "legacy": true}"#);
        let b = temp_with(".json", r#"{"name": "svc", "port": 8080, "tls": {}}"#);

        let result = run_compare(&args(path_of(&a), path_of(&b), &[]), &Config::default()).unwrap();
        let counts = result.counts();
        assert_eq!((counts.added, counts.removed, counts.modified), (1, 1, 1));
        assert_eq!(
            result.of_kind(DiffKind::Modified).next().unwrap().path().to_string(),
            "port"
        );
    }

    #[test]
    fn compare_across_formats() {
        let a = temp_with(".yaml", "server:\n  port: 80\n");
        let b = temp_with(".toml", "[server]\nport = 80\n");
        let result = run_compare(&args(path_of(&a), path_of(&b), &[]), &Config::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn filter_from_flag_and_config() {
        let a = temp_with(".json", r#"{"a": 1, "b": 1, "c": 1}"#);
        let b = temp_with(".json", r#"{"a": 2, "b": 2, "c": 2}"#);
        let config = Config {
            filters: vec!["a".into()],
            ..Config::default()
        };

        let result = run_compare(&args(path_of(&a), path_of(&b), &["-f", "c"]), &config).unwrap();
        let paths: Vec<String> = result.iter().map(|r| r.path().to_string()).collect();
        assert_eq!(paths, vec!["a", "c"]);
    }

    #[test]
    fn explicit_type_for_unknown_extension() {
        let a = temp_with(".conf", "[db]\nhost=a\n");
        let b = temp_with(".conf", "[db]\nhost=b\n");

        assert!(run_compare(&args(path_of(&a), path_of(&b), &[]), &Config::default()).is_err());
        let result = run_compare(
            &args(path_of(&a), path_of(&b), &["--type", "ini"]),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn both_stdin_rejected() {
        let err = run_compare(&args("-", "-", &["--type", "json"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn decode_failure_carries_help() {
        let a = temp_with(".json", r#"{"a": 1,}"#);
        let b = temp_with(".json", "{}");
        let err = run_compare(&args(path_of(&a), path_of(&b), &[]), &Config::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to load first document"));
        assert!(message.contains("trailing commas"));
    }

    #[test]
    fn size_limit_from_flag() {
        let a = temp_with(".json", r#"{"a": [1, 2, 3, 4, 5, 6]}"#);
        let b = temp_with(".json", "{}");
        let err = run_compare(
            &args(path_of(&a), path_of(&b), &["--max-size", "8"]),
            &Config::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("exceeding the limit"));
    }

    #[test]
    fn check_fails_only_on_differences() {
        let a = temp_with(".json", r#"{"a": 1}"#);
        let b = temp_with(".json", r#"{"a": 2}"#);
        let config = Config::default();

        let checked = args(path_of(&a), path_of(&b), &["-c"]);
        let result = run_compare(&checked, &config).unwrap();
        assert!(fails_check(&checked, &result));

        let same = args(path_of(&a), path_of(&a), &["-c"]);
        let result = run_compare(&same, &config).unwrap();
        assert!(!fails_check(&same, &result));

        let unchecked = args(path_of(&a), path_of(&b), &[]);
        let result = run_compare(&unchecked, &config).unwrap();
        assert!(!fails_check(&unchecked, &result));
    }
}
