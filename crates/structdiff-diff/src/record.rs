//! The diff result model consumed by renderers.

use std::fmt;

use serde::Serialize;
use structdiff_types::{Path, Value};

/// The kind of a single difference.
///
/// There is no `Moved` kind: sequences are compared by position, so an
/// element that shifts index is reported as modifications and a trailing
/// addition or removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Modified,
}

impl DiffKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }

    /// One-character marker used in line-oriented output.
    pub fn symbol(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Modified => '~',
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One reported difference.
///
/// `Added` records carry only the new value, `Removed` only the old one,
/// `Modified` both. The constructors are the only way to build a record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffRecord {
    #[serde(rename = "type")]
    kind: DiffKind,
    path: Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_value: Option<Value>,
}

impl DiffRecord {
    pub fn added(path: Path, new_value: Value) -> Self {
        Self {
            kind: DiffKind::Added,
            path,
            old_value: None,
            new_value: Some(new_value),
        }
    }

    pub fn removed(path: Path, old_value: Value) -> Self {
        Self {
            kind: DiffKind::Removed,
            path,
            old_value: Some(old_value),
            new_value: None,
        }
    }

    pub fn modified(path: Path, old_value: Value, new_value: Value) -> Self {
        Self {
            kind: DiffKind::Modified,
            path,
            old_value: Some(old_value),
            new_value: Some(new_value),
        }
    }

    pub fn kind(&self) -> DiffKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    pub fn new_value(&self) -> Option<&Value> {
        self.new_value.as_ref()
    }
}

/// Per-kind record counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffCounts {
    pub total: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl DiffCounts {
    fn tally(records: &[DiffRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut counts, record| {
                match record.kind() {
                    DiffKind::Added => counts.added += 1,
                    DiffKind::Removed => counts.removed += 1,
                    DiffKind::Modified => counts.modified += 1,
                }
                counts
            },
        )
    }
}

/// The ordered outcome of one diff call.
///
/// Serializes as `{"summary": {...counts}, "diffs": [...records]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiffResult {
    #[serde(rename = "summary")]
    counts: DiffCounts,
    #[serde(rename = "diffs")]
    records: Vec<DiffRecord>,
}

impl DiffResult {
    /// Freeze a list of records, computing the counts.
    pub fn from_records(records: Vec<DiffRecord>) -> Self {
        Self {
            counts: DiffCounts::tally(&records),
            records,
        }
    }

    /// Returns `true` if the two inputs were equal (within the filter).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[DiffRecord] {
        &self.records
    }

    pub fn counts(&self) -> DiffCounts {
        self.counts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffRecord> {
        self.records.iter()
    }

    /// Records of a single kind, in result order.
    pub fn of_kind(&self, kind: DiffKind) -> impl Iterator<Item = &DiffRecord> {
        self.records.iter().filter(move |r| r.kind() == kind)
    }

    pub fn into_records(self) -> Vec<DiffRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a DiffRecord;
    type IntoIter = std::slice::Iter<'a, DiffRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
