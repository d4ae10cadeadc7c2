//! Core foundations of the front door
//!
//! Error handling, configuration and logging shared by the encoder and the
//! decoder.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used items
pub use config::{load_config_or_default, Config, DecodingConfig, EncodingConfig, LoggingConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
