//! Massive Encoding - aligned, self-describing binary encoding for serde types
//!
//! Values are first built into an intermediate storage tree (null, single
//! values, keyed and unkeyed containers) and then written to a flat,
//! word-aligned byte layout in two passes. Decoding reads the bytes back into
//! the same tree and drives a type's `Deserialize` impl from it.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let bytes = massive_encoding::to_vec(&Point { x: 1, y: 2 })?;
//! let point: Point = massive_encoding::from_slice(&bytes)?;
//! assert_eq!(point, Point { x: 1, y: 2 });
//! # Ok::<(), massive_encoding::Error>(())
//! ```
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Front door
pub mod decoder;
pub mod encoder;

#[doc(hidden)]
pub use tracing;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Error, Result};
pub use decoder::{from_slice, BinaryDecoder};
pub use encoder::{to_bytes, to_vec, BinaryEncoder};
pub use massive_encoding_core::{
    CodingKey, CodingPath, DecodingError, EncodedData, EncodedType, KeyedContainer, ReadLimits,
    SingleValueContainer, StorageContainer, StorageReference, UnkeyedContainer,
};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load configuration and install logging
pub fn init() -> Result<Config> {
    let config = Config::load()?;
    crate::core::init_logging(&config.logging)?;

    log_info!("Initializing {} v{}", NAME, VERSION);

    Ok(config)
}
