use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::PoolSuffixes;
use crate::reaction::Side;

/// Names of high-concentration compounds.
///
/// A pool compound is registered under a side-specific name, so its atoms
/// on the educt side of one reaction are never linked to its atoms on the
/// product side of another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSet {
    names: HashSet<String>,
}

impl PoolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one name per line; blank lines are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut names = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let name = line.trim();
            if !name.is_empty() {
                names.insert(name.to_string());
            }
        }
        Ok(Self { names })
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The registry name of `name` on `side`.
    pub fn rename<'a>(&self, name: &'a str, side: Side, suffixes: &PoolSuffixes) -> Cow<'a, str> {
        if !self.contains(name) {
            return Cow::Borrowed(name);
        }
        let suffix = match side {
            Side::Educt => &suffixes.educt,
            Side::Product => &suffixes.product,
        };
        Cow::Owned(format!("{name}{suffix}"))
    }
}

impl<S: Into<String>> FromIterator<S> for PoolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
