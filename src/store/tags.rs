use std::collections::BTreeSet;
use std::fmt;

/// Ordered set of string tags qualifying a result name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `tag` added.
    pub fn with(&self, tag: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.0.insert(tag.into());
        next
    }

    /// Returns the union of both tag sets.
    pub fn union(&self, other: &Tags) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// `true` when every tag in `subset` is present here.
    pub fn is_superset_of(&self, subset: &Tags) -> bool {
        self.0.is_superset(&subset.0)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Tags {
    fn from(tags: [&str; N]) -> Self {
        tags.into_iter().collect()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(tag)?;
        }
        f.write_str("}")
    }
}
