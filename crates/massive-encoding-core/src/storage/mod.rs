//! Intermediate storage model: containers, packed single values and slots

pub mod container;
pub mod reference;
pub mod single_value;

pub use container::{KeyedContainer, StorageContainer, UnkeyedContainer};
pub use reference::StorageReference;
pub use single_value::SingleValueContainer;
