use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::filter::PathFilter;

/// How mapping keys on the two sides are paired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyMatch {
    /// Keys pair only when their text is identical.
    #[default]
    Exact,
    /// Keys pair when they are equal after lowercasing. If several keys on
    /// one side collide, the lexicographically smallest one is used.
    CaseInsensitive,
}

impl KeyMatch {
    /// The text under which `key` is paired and ordered.
    pub fn normalize<'k>(&self, key: &'k str) -> Cow<'k, str> {
        match self {
            Self::Exact => Cow::Borrowed(key),
            Self::CaseInsensitive => Cow::Owned(key.to_lowercase()),
        }
    }
}

/// Settings for one diff call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Only records at or beneath these prefixes are emitted.
    pub filter: PathFilter,
    /// Mapping key pairing policy.
    pub key_match: KeyMatch,
    /// Compare string scalars without regard to case.
    pub value_compare_ignore_case: bool,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_key_match(mut self, key_match: KeyMatch) -> Self {
        self.key_match = key_match;
        self
    }

    pub fn ignore_value_case(mut self, ignore: bool) -> Self {
        self.value_compare_ignore_case = ignore;
        self
    }
}
