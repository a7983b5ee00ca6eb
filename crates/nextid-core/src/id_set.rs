//! Immutable sets of allocated identifiers
//!
//! Every derived set (difference, union) is a fresh value; nothing here
//! mutates a set after construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single allocated identifier
///
/// Wider than any value the parser accepts, so `max + 1` always fits.
pub type Identifier = u64;

/// Smallest identifier treated as allocatable. Lower values are reserved
/// sentinels (e.g. `None = 0`) and never enter a parsed set.
pub const DEFAULT_THRESHOLD: Identifier = 2000;

/// Ordered set of identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierSet {
    ids: BTreeSet<Identifier>,
}

impl IdentifierSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identifiers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the set holds no identifiers
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership check
    #[inline]
    #[must_use]
    pub fn contains(&self, id: Identifier) -> bool {
        self.ids.contains(&id)
    }

    /// Largest identifier, if any
    #[inline]
    #[must_use]
    pub fn max(&self) -> Option<Identifier> {
        self.ids.last().copied()
    }

    /// Smallest identifier, if any
    #[inline]
    #[must_use]
    pub fn min(&self) -> Option<Identifier> {
        self.ids.first().copied()
    }

    /// Iterate in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Identifier> + '_ {
        self.ids.iter().copied()
    }

    /// Identifiers in `self` that are not in `other`
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.ids.difference(&other.ids).copied().collect()
    }

    /// Identifiers in either set
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.ids.union(&other.ids).copied().collect()
    }

    /// Keep only identifiers `>= threshold`
    #[must_use]
    pub fn at_or_above(&self, threshold: Identifier) -> Self {
        self.ids.range(threshold..).copied().collect()
    }

    /// Ascending vector copy
    #[must_use]
    pub fn to_vec(&self) -> Vec<Identifier> {
        self.iter().collect()
    }
}

impl FromIterator<Identifier> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = Identifier>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = Identifier;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Identifier>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

impl<const N: usize> From<[Identifier; N]> for IdentifierSet {
    fn from(ids: [Identifier; N]) -> Self {
        ids.into_iter().collect()
    }
}
