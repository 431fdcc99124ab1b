use colored::Colorize;
use structdiff_diff::{DiffCounts, DiffKind, DiffRecord, DiffResult};

/// `Found N differences (...)`, or `No differences found.`
pub fn summary_line(counts: DiffCounts) -> String {
    if counts.total == 0 {
        return "No differences found.".to_string();
    }

    let parts: Vec<String> = [
        (counts.added, "added"),
        (counts.removed, "removed"),
        (counts.modified, "modified"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{n} {label}"))
    .collect();

    let noun = if counts.total == 1 { "difference" } else { "differences" };
    format!("Found {} {noun} ({})", counts.total, parts.join(", "))
}

fn record_line(record: &DiffRecord) -> String {
    let path = if record.path().is_root() {
        "(root)".to_string()
    } else {
        record.path().to_string()
    };
    let show = |value: Option<&structdiff_types::Value>| value.map(ToString::to_string).unwrap_or_default();

    match record.kind() {
        DiffKind::Added => format!("{path}: {}", show(record.new_value())),
        DiffKind::Removed => format!("{path}: {}", show(record.old_value())),
        DiffKind::Modified => format!(
            "{path}: {} → {}",
            show(record.old_value()),
            show(record.new_value())
        ),
    }
}

fn marker(kind: DiffKind, color: bool) -> String {
    let symbol = kind.symbol().to_string();
    if !color {
        return symbol;
    }
    match kind {
        DiffKind::Added => symbol.green().to_string(),
        DiffKind::Removed => symbol.red().to_string(),
        DiffKind::Modified => symbol.yellow().to_string(),
    }
}

/// Summary line, a blank line, then one line per record.
pub fn render_text(result: &DiffResult, color: bool) -> String {
    let summary = summary_line(result.counts());
    let mut out = if color && result.is_empty() {
        summary.green().to_string()
    } else if color {
        summary.magenta().to_string()
    } else {
        summary
    };
    out.push('\n');

    if !result.is_empty() {
        out.push('\n');
        for record in result {
            out.push_str(&format!("{} {}\n", marker(record.kind(), color), record_line(record)));
        }
    }
    out
}

pub fn render_json(result: &DiffResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn render_json_summary(result: &DiffResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serde_json::json!({ "summary": result.counts() }))
}
