//! Port configuration
//!
//! Run-time description of the flash region handed to the storage library
//! and the compile-time default ENV set.

pub mod env;
pub mod geometry;

pub use env::{has_unique_keys, DEFAULT_ENV};
pub use geometry::{FlashGeometry, GeometryError};

/// Errors detected while assembling a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash region is unusable with this controller
    Geometry(GeometryError),
    /// Default ENV set lists the same key twice
    DuplicateEnvKey,
}

impl From<GeometryError> for ConfigError {
    fn from(err: GeometryError) -> Self {
        ConfigError::Geometry(err)
    }
}
