//! Path filter: restrict reported differences to selected sub-trees.

use std::collections::BTreeSet;

use structdiff_types::{Path, TypeError};

/// A set of allowed path prefixes.
///
/// An empty filter allows everything. Otherwise a path is allowed when it
/// equals one of the prefixes or lies beneath one, compared segment by
/// segment. The filter only gates which records are emitted; the engine
/// still walks the whole tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathFilter {
    prefixes: BTreeSet<Path>,
}

impl PathFilter {
    /// A filter over already-parsed prefixes.
    pub fn new(prefixes: impl IntoIterator<Item = Path>) -> Self {
        Self {
            prefixes: prefixes.into_iter().collect(),
        }
    }

    /// Parse prefixes from their printed form, e.g. `user.name` or `items[0]`.
    pub fn parse<I, S>(entries: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = entries
            .into_iter()
            .map(|s| s.as_ref().trim().parse::<Path>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { prefixes })
    }

    /// Returns `true` if no prefixes are configured.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &Path> {
        self.prefixes.iter()
    }

    /// Returns `true` if a record at `path` should be reported.
    pub fn allows(&self, path: &Path) -> bool {
        self.is_empty() || self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

impl FromIterator<Path> for PathFilter {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn empty_filter_allows_everything() {
        let filter = PathFilter::default();
        assert!(filter.is_empty());
        assert!(filter.allows(&Path::root()));
        assert!(filter.allows(&path("deep.nested[3].field")));
    }

    #[test]
    fn exact_and_descendant_paths_allowed() {
        let filter = PathFilter::parse(["user.name"]).unwrap();
        assert!(filter.allows(&path("user.name")));
        assert!(filter.allows(&path("user.name.first")));
        assert!(filter.allows(&path("user.name[0]")));
    }

    #[test]
    fn ancestors_and_siblings_rejected() {
        let filter = PathFilter::parse(["user.name"]).unwrap();
        assert!(!filter.allows(&Path::root()));
        assert!(!filter.allows(&path("user")));
        assert!(!filter.allows(&path("user.age")));
    }

    #[test]
    fn prefix_match_is_segment_aligned() {
        let filter = PathFilter::parse(["user"]).unwrap();
        assert!(filter.allows(&path("user.id")));
        assert!(!filter.allows(&path("user1")));
        assert!(!filter.allows(&path("username")));
    }

    #[test]
    fn any_prefix_suffices() {
        let filter = PathFilter::parse(["a", "b[1]"]).unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.allows(&path("a.x")));
        assert!(filter.allows(&path("b[1].y")));
        assert!(!filter.allows(&path("b[0]")));
    }

    #[test]
    fn parse_trims_and_rejects_malformed() {
        let filter = PathFilter::parse(["  user.name  "]).unwrap();
        assert!(filter.allows(&path("user.name")));
        assert!(PathFilter::parse(["user..name"]).is_err());
    }

    #[test]
    fn root_prefix_allows_everything() {
        let filter = PathFilter::new([Path::root()]);
        assert!(!filter.is_empty());
        assert!(filter.allows(&path("anything.at[0].all")));
    }
}
