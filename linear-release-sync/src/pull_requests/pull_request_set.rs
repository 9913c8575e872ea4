//! Deduplicated set of canonical pull request URLs.

use std::collections::btree_set::{self, BTreeSet};

/// A set of canonical pull request URLs.
///
/// Iteration is sorted so logs and summaries are stable between runs; callers
/// must not rely on any particular order beyond that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestSet(BTreeSet<String>);

impl PullRequestSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a URL, returning `true` if it was not already present.
    pub fn insert(&mut self, url: String) -> bool {
        self.0.insert(url)
    }

    /// Adds every URL of `other` to this set.
    pub fn merge(&mut self, other: PullRequestSet) {
        self.0.extend(other.0);
    }

    /// Returns true if the URL is in the set.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.0.contains(url)
    }

    /// Number of distinct pull requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no pull requests were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the URLs.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }
}

impl FromIterator<String> for PullRequestSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<String> for PullRequestSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for PullRequestSet {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PullRequestSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
