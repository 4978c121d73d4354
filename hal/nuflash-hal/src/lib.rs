//! nuflash Hardware Abstraction Layer
//!
//! This crate defines the two seams of the storage port: the primitives the
//! port consumes from the chip (flash controller, interrupt masking) and the
//! contract it offers to the storage library sitting on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Storage library (ENV / log store)      │
//! └─────────────────────────────────────────┘
//!                     │  EnvPort
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nuflash-core (FlashPort)               │
//! └─────────────────────────────────────────┘
//!                     │  FlashController, InterruptControl
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nuflash-hal-m480 (FMC registers)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::FlashController`] - Page erase, word program, mapped reads
//! - [`irq::InterruptControl`] - Interrupt masking for the cache lock
//! - [`port::EnvPort`] - The port contract called by the storage library

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod irq;
pub mod port;

// Re-export key traits at crate root for convenience
pub use flash::{ControllerError, FlashController, WORD_SIZE};
pub use irq::InterruptControl;
pub use port::{EnvEntry, EnvPort, OperationResult, PortError};
