//! Coding paths used to locate a value inside an encoded document.

use std::fmt;

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodingKey {
    /// Entry of a keyed container
    Key(String),
    /// Element of an unkeyed container
    Index(usize),
}

impl CodingKey {
    /// String form of the key; indices render as decimal digits.
    pub fn string_value(&self) -> String {
        match self {
            CodingKey::Key(key) => key.clone(),
            CodingKey::Index(index) => index.to_string(),
        }
    }

    /// Integer form of the key, present only for indices.
    pub fn int_value(&self) -> Option<usize> {
        match self {
            CodingKey::Key(_) => None,
            CodingKey::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for CodingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodingKey::Key(key) => write!(f, "\"{}\"", key),
            CodingKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for CodingKey {
    fn from(key: &str) -> Self {
        CodingKey::Key(key.to_string())
    }
}

impl From<String> for CodingKey {
    fn from(key: String) -> Self {
        CodingKey::Key(key)
    }
}

impl From<usize> for CodingKey {
    fn from(index: usize) -> Self {
        CodingKey::Index(index)
    }
}

/// Ordered list of keys and indices traversed from the document root.
///
/// Renders as `a.b[2].c`; the empty path renders as `<root>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodingPath(Vec<CodingKey>);

impl CodingPath {
    /// The empty path, pointing at the document root.
    pub fn root() -> Self {
        CodingPath(Vec::new())
    }

    /// Returns a new path extended by `key`.
    pub fn appending(&self, key: impl Into<CodingKey>) -> Self {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend_from_slice(&self.0);
        keys.push(key.into());
        CodingPath(keys)
    }

    /// Extends this path in place.
    pub fn push(&mut self, key: impl Into<CodingKey>) {
        self.0.push(key.into());
    }

    /// Removes the innermost key.
    pub fn pop(&mut self) -> Option<CodingKey> {
        self.0.pop()
    }

    /// Number of keys in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this path points at the document root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Innermost key, if any.
    pub fn last(&self) -> Option<&CodingKey> {
        self.0.last()
    }

    /// Iterates over the keys from the root outwards.
    pub fn iter(&self) -> std::slice::Iter<'_, CodingKey> {
        self.0.iter()
    }

    /// Borrows the keys as a slice.
    pub fn as_slice(&self) -> &[CodingKey] {
        &self.0
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (position, key) in self.0.iter().enumerate() {
            match key {
                CodingKey::Index(index) => write!(f, "[{}]", index)?,
                CodingKey::Key(key) if position == 0 => f.write_str(key)?,
                CodingKey::Key(key) => write!(f, ".{}", key)?,
            }
        }
        Ok(())
    }
}

impl From<Vec<CodingKey>> for CodingPath {
    fn from(keys: Vec<CodingKey>) -> Self {
        CodingPath(keys)
    }
}

impl<'a> IntoIterator for &'a CodingPath {
    type Item = &'a CodingKey;
    type IntoIter = std::slice::Iter<'a, CodingKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
