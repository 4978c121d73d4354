//! Board-agnostic flash adaptation layer for the nuflash storage port
//!
//! This crate contains everything between the storage library and the
//! flash controller that does not depend on a specific chip:
//!
//! - Alignment validation of erase and write ranges
//! - Scoped controller sessions (unlock + program mode)
//! - Page erase, verified word program and mapped reads
//! - Interrupt-masking lock for the library's RAM cache
//! - Bounded diagnostic channel
//! - [`FlashPort`], implementing [`nuflash_hal::EnvPort`] and the
//!   `embedded-storage` NOR flash traits
//!
//! # Features
//!
//! - `defmt` - derive `defmt::Format` and log flash failures through defmt
//! - `debug-log` - enable debug traces and read hex dumps on the diagnostic channel
//! - `serde` - derive serde traits for [`config::FlashGeometry`]

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod diag;
pub mod flash;
pub mod lock;
pub mod port;

#[cfg(test)]
pub(crate) mod sim;

pub use config::{FlashGeometry, DEFAULT_ENV};
pub use port::{FlashAccessError, FlashPort};
