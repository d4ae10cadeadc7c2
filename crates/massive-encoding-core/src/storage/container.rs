//! In-memory tree of encoded values

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::storage::reference::StorageReference;
use crate::storage::single_value::SingleValueContainer;
use crate::types::encoded_type::Scalar;

/// One encoded value
///
/// A tree of these is built by an encoder, written by the codec writer, and
/// rebuilt by the codec reader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StorageContainer {
    /// Explicit absence of a value
    #[default]
    Null,
    /// Packed scalar or string
    SingleValue(SingleValueContainer),
    /// String-keyed map
    Keyed(KeyedContainer),
    /// Ordered sequence
    Unkeyed(UnkeyedContainer),
}

impl StorageContainer {
    /// Pack a scalar into a single value container
    pub fn scalar<T: Scalar>(value: T) -> Self {
        StorageContainer::SingleValue(SingleValueContainer::new(value))
    }

    /// Pack a string into a single value container
    pub fn string(value: &str) -> Self {
        StorageContainer::SingleValue(SingleValueContainer::string(value))
    }

    /// Whether this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, StorageContainer::Null)
    }

    /// Borrow the single value, if this is one
    pub fn as_single_value(&self) -> Option<&SingleValueContainer> {
        match self {
            StorageContainer::SingleValue(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the keyed container, if this is one
    pub fn as_keyed(&self) -> Option<&KeyedContainer> {
        match self {
            StorageContainer::Keyed(keyed) => Some(keyed),
            _ => None,
        }
    }

    /// Borrow the unkeyed container, if this is one
    pub fn as_unkeyed(&self) -> Option<&UnkeyedContainer> {
        match self {
            StorageContainer::Unkeyed(unkeyed) => Some(unkeyed),
            _ => None,
        }
    }

    /// Noun phrase naming the variant, used in error descriptions
    pub fn kind_name(&self) -> &'static str {
        match self {
            StorageContainer::Null => "a null value",
            StorageContainer::SingleValue(_) => "a single value",
            StorageContainer::Keyed(_) => "a keyed container",
            StorageContainer::Unkeyed(_) => "an unkeyed container",
        }
    }

    /// Turn this slot into a keyed container unless it already is one
    pub fn keyed_or_insert(&mut self) -> &mut KeyedContainer {
        if !matches!(self, StorageContainer::Keyed(_)) {
            *self = StorageContainer::Keyed(KeyedContainer::new());
        }
        match self {
            StorageContainer::Keyed(keyed) => keyed,
            _ => unreachable!("slot was just replaced with a keyed container"),
        }
    }

    /// Turn this slot into an unkeyed container unless it already is one
    pub fn unkeyed_or_insert(&mut self) -> &mut UnkeyedContainer {
        if !matches!(self, StorageContainer::Unkeyed(_)) {
            *self = StorageContainer::Unkeyed(UnkeyedContainer::new());
        }
        match self {
            StorageContainer::Unkeyed(unkeyed) => unkeyed,
            _ => unreachable!("slot was just replaced with an unkeyed container"),
        }
    }
}

impl From<SingleValueContainer> for StorageContainer {
    fn from(value: SingleValueContainer) -> Self {
        StorageContainer::SingleValue(value)
    }
}

impl From<KeyedContainer> for StorageContainer {
    fn from(value: KeyedContainer) -> Self {
        StorageContainer::Keyed(value)
    }
}

impl From<UnkeyedContainer> for StorageContainer {
    fn from(value: UnkeyedContainer) -> Self {
        StorageContainer::Unkeyed(value)
    }
}

impl fmt::Display for StorageContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageContainer::Null => f.write_str("null"),
            StorageContainer::SingleValue(value) => fmt::Display::fmt(value, f),
            StorageContainer::Keyed(keyed) => fmt::Display::fmt(keyed, f),
            StorageContainer::Unkeyed(unkeyed) => fmt::Display::fmt(unkeyed, f),
        }
    }
}

/// String-keyed map of containers
///
/// Keys are kept sorted, which makes the wire order deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyedContainer {
    entries: BTreeMap<String, StorageContainer>,
}

impl KeyedContainer {
    /// Create an empty keyed container
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&StorageContainer> {
        self.entries.get(key)
    }

    /// Mutable value stored under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut StorageContainer> {
        self.entries.get_mut(key)
    }

    /// Store `value` under `key`, returning the value it replaced
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StorageContainer>,
    ) -> Option<StorageContainer> {
        self.entries.insert(key.into(), value.into())
    }

    /// Whether `key` has a value
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, StorageContainer> {
        self.entries.iter()
    }

    /// Slot for `key`; the entry is created on first write
    pub fn reference(&mut self, key: impl Into<String>) -> StorageReference<'_> {
        StorageReference::for_key(self, key)
    }

    /// Entry for `key`, holding null if it was absent
    pub(crate) fn slot(&mut self, key: String) -> &mut StorageContainer {
        self.entries.entry(key).or_default()
    }
}

impl<K: Into<String>, V: Into<StorageContainer>> FromIterator<(K, V)> for KeyedContainer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KeyedContainer {
    type Item = (&'a String, &'a StorageContainer);
    type IntoIter = btree_map::Iter<'a, String, StorageContainer>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for KeyedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("[:]");
        }
        f.write_str("[")?;
        for (position, (key, value)) in self.entries.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("]")
    }
}

/// Ordered sequence of containers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnkeyedContainer {
    items: Vec<StorageContainer>,
}

impl UnkeyedContainer {
    /// Create an empty unkeyed container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty unkeyed container with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    /// Append a value
    pub fn push(&mut self, value: impl Into<StorageContainer>) {
        self.items.push(value.into());
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&StorageContainer> {
        self.items.get(index)
    }

    /// Mutable element at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut StorageContainer> {
        self.items.get_mut(index)
    }

    /// Replace the element at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the current length.
    pub fn set(&mut self, index: usize, value: impl Into<StorageContainer>) {
        assert!(
            index < self.items.len(),
            "index {} out of range for unkeyed container of length {}",
            index,
            self.items.len()
        );
        self.items[index] = value.into();
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the container has no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, StorageContainer> {
        self.items.iter()
    }

    /// Reserve a new trailing slot holding null and return a reference to it
    pub fn push_reference(&mut self) -> StorageReference<'_> {
        let index = self.items.len();
        self.items.push(StorageContainer::Null);
        StorageReference::for_index(self, index)
    }
}

impl<V: Into<StorageContainer>> FromIterator<V> for UnkeyedContainer {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UnkeyedContainer {
    type Item = &'a StorageContainer;
    type IntoIter = std::slice::Iter<'a, StorageContainer>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for UnkeyedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (position, value) in self.items.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_default_and_singleton() {
        assert_eq!(StorageContainer::default(), StorageContainer::Null);
        assert_eq!(StorageContainer::Null, StorageContainer::Null);
        assert!(StorageContainer::Null.is_null());
    }

    #[test]
    fn keyed_set_replaces_previous_value() {
        let mut keyed = KeyedContainer::new();
        assert!(keyed.set("a", StorageContainer::scalar(1i32)).is_none());
        let previous = keyed.set("a", StorageContainer::scalar(2i32));
        assert_eq!(previous, Some(StorageContainer::scalar(1i32)));
        assert_eq!(keyed.len(), 1);
        assert_eq!(keyed.get("a"), Some(&StorageContainer::scalar(2i32)));
    }

    #[test]
    fn keyed_keys_are_sorted() {
        let keyed: KeyedContainer = vec![
            ("b", StorageContainer::Null),
            ("a", StorageContainer::Null),
            ("", StorageContainer::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["", "a", "b"]);
        assert!(keyed.contains(""));
        assert!(!keyed.contains("c"));
    }

    #[test]
    fn unkeyed_push_get_set() {
        let mut unkeyed = UnkeyedContainer::new();
        unkeyed.push(StorageContainer::scalar(1u8));
        unkeyed.push(StorageContainer::string("two"));
        unkeyed.set(0, StorageContainer::Null);
        assert_eq!(unkeyed.len(), 2);
        assert_eq!(unkeyed.get(0), Some(&StorageContainer::Null));
        assert_eq!(unkeyed.get(2), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn unkeyed_set_past_end_panics() {
        let mut unkeyed = UnkeyedContainer::new();
        unkeyed.set(0, StorageContainer::Null);
    }

    #[test]
    fn keyed_or_insert_reuses_existing_container() {
        let mut slot = StorageContainer::Null;
        slot.keyed_or_insert().set("a", StorageContainer::scalar(true));
        slot.keyed_or_insert().set("b", StorageContainer::scalar(false));
        assert_eq!(slot.as_keyed().map(KeyedContainer::len), Some(2));

        slot.unkeyed_or_insert();
        assert_eq!(slot.as_unkeyed().map(UnkeyedContainer::len), Some(0));
    }

    #[test]
    fn display_descriptions() {
        let mut keyed = KeyedContainer::new();
        keyed.set("a", StorageContainer::scalar(10i32));
        keyed.set(
            "b",
            [StorageContainer::scalar(1i32), StorageContainer::Null]
                .into_iter()
                .collect::<UnkeyedContainer>(),
        );
        assert_eq!(StorageContainer::from(keyed).to_string(), "[a: 10, b: [1, null]]");
        assert_eq!(KeyedContainer::new().to_string(), "[:]");
        assert_eq!(UnkeyedContainer::new().to_string(), "[]");
    }
}
