//! Writable slots whose eventual content is decided after they are created

use crate::storage::container::{KeyedContainer, StorageContainer, UnkeyedContainer};
use crate::storage::single_value::SingleValueContainer;
use crate::types::encoded_type::Scalar;

/// Exclusive handle on one slot of a storage tree under construction
///
/// The borrow ties the reference to its parent, so it cannot outlive the
/// encode pass that created it.
#[derive(Debug)]
pub enum StorageReference<'a> {
    /// Free-standing slot, used for the document root
    Local(&'a mut Option<StorageContainer>),
    /// Entry of a keyed container
    Keyed {
        /// Parent container
        container: &'a mut KeyedContainer,
        /// Key captured at creation
        key: String,
    },
    /// Element of an unkeyed container
    Unkeyed {
        /// Parent container
        container: &'a mut UnkeyedContainer,
        /// Index captured at creation; always in range
        index: usize,
    },
}

impl<'a> StorageReference<'a> {
    /// Reference a free-standing slot
    pub fn local(slot: &'a mut Option<StorageContainer>) -> Self {
        StorageReference::Local(slot)
    }

    /// Reference the entry for `key` in `container`
    pub fn for_key(container: &'a mut KeyedContainer, key: impl Into<String>) -> Self {
        StorageReference::Keyed {
            container,
            key: key.into(),
        }
    }

    /// Reference an existing element of `container`
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the container length.
    pub fn for_index(container: &'a mut UnkeyedContainer, index: usize) -> Self {
        assert!(
            index < container.len(),
            "index {} out of range for unkeyed container of length {}",
            index,
            container.len()
        );
        StorageReference::Unkeyed { container, index }
    }

    /// Current content of the slot, if it has been written
    pub fn get(&self) -> Option<&StorageContainer> {
        match self {
            StorageReference::Local(slot) => slot.as_ref(),
            StorageReference::Keyed { container, key } => container.get(key),
            StorageReference::Unkeyed { container, index } => container.get(*index),
        }
    }

    /// Overwrite the slot
    pub fn set(&mut self, value: impl Into<StorageContainer>) {
        let value = value.into();
        match self {
            StorageReference::Local(slot) => **slot = Some(value),
            StorageReference::Keyed { container, key } => {
                container.set(key.clone(), value);
            }
            StorageReference::Unkeyed { container, index } => container.set(*index, value),
        }
    }

    /// Shorter-lived reference to the same slot
    pub fn reborrow(&mut self) -> StorageReference<'_> {
        match self {
            StorageReference::Local(slot) => StorageReference::Local(&mut **slot),
            StorageReference::Keyed { container, key } => StorageReference::Keyed {
                container: &mut **container,
                key: key.clone(),
            },
            StorageReference::Unkeyed { container, index } => StorageReference::Unkeyed {
                container: &mut **container,
                index: *index,
            },
        }
    }

    /// Store null
    pub fn encode_null(&mut self) {
        self.set(StorageContainer::Null);
    }

    /// Store a scalar
    pub fn encode_scalar<T: Scalar>(&mut self, value: T) {
        self.set(SingleValueContainer::new(value));
    }

    /// Store a string
    pub fn encode_string(&mut self, value: &str) {
        self.set(SingleValueContainer::string(value));
    }

    /// Keyed container in this slot, created unless one is already there
    pub fn keyed(self) -> &'a mut KeyedContainer {
        self.into_slot().keyed_or_insert()
    }

    /// Unkeyed container in this slot, created unless one is already there
    pub fn unkeyed(self) -> &'a mut UnkeyedContainer {
        self.into_slot().unkeyed_or_insert()
    }

    fn into_slot(self) -> &'a mut StorageContainer {
        match self {
            StorageReference::Local(slot) => slot.get_or_insert(StorageContainer::Null),
            StorageReference::Keyed { container, key } => container.slot(key),
            StorageReference::Unkeyed { container, index } => container
                .get_mut(index)
                .unwrap_or_else(|| panic!("index {} out of range for unkeyed container", index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_slot_starts_empty() {
        let mut root = None;
        let mut reference = StorageReference::local(&mut root);
        assert!(reference.get().is_none());
        reference.encode_scalar(10i32);
        assert_eq!(reference.get(), Some(&StorageContainer::scalar(10i32)));
        assert_eq!(root, Some(StorageContainer::scalar(10i32)));
    }

    #[test]
    fn keyed_slot_writes_through() {
        let mut keyed = KeyedContainer::new();
        {
            let mut reference = keyed.reference("a");
            assert!(reference.get().is_none());
            reference.encode_string("x");
            reference.encode_null();
        }
        assert_eq!(keyed.get("a"), Some(&StorageContainer::Null));
    }

    #[test]
    fn unkeyed_slot_is_reserved_with_null() {
        let mut unkeyed = UnkeyedContainer::new();
        {
            let reference = unkeyed.push_reference();
            assert_eq!(reference.get(), Some(&StorageContainer::Null));
        }
        unkeyed.push(StorageContainer::scalar(2i32));
        {
            let mut reference = StorageReference::for_index(&mut unkeyed, 0);
            reference.encode_scalar(1i32);
        }
        assert_eq!(
            unkeyed.iter().cloned().collect::<Vec<_>>(),
            vec![StorageContainer::scalar(1i32), StorageContainer::scalar(2i32)]
        );
    }

    #[test]
    fn child_containers_attach_to_parent() {
        let mut root = None;
        let reference = StorageReference::local(&mut root);
        let keyed = reference.keyed();
        keyed.reference("list").unkeyed().push(StorageContainer::scalar(1i32));
        keyed.reference("list").unkeyed().push(StorageContainer::scalar(2i32));
        keyed.reference("inner").keyed().set("x", StorageContainer::Null);

        let root = root.unwrap_or_default();
        let keyed = root.as_keyed().unwrap();
        assert_eq!(keyed.get("list").and_then(StorageContainer::as_unkeyed).map(|u| u.len()), Some(2));
        assert!(keyed.get("inner").and_then(StorageContainer::as_keyed).unwrap().contains("x"));
    }

    #[test]
    fn keyed_replaces_a_non_keyed_value() {
        let mut root = Some(StorageContainer::scalar(1i32));
        StorageReference::local(&mut root).keyed().set("a", StorageContainer::Null);
        assert!(root.unwrap().as_keyed().is_some());
    }

    #[test]
    fn reborrow_targets_the_same_slot() {
        let mut keyed = KeyedContainer::new();
        let mut reference = keyed.reference("k");
        reference.reborrow().encode_scalar(false);
        assert_eq!(reference.get(), Some(&StorageContainer::scalar(false)));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn for_index_rejects_missing_element() {
        let mut unkeyed = UnkeyedContainer::new();
        let _ = StorageReference::for_index(&mut unkeyed, 0);
    }
}
