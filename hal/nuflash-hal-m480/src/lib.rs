//! NuMicro-specific backend for the nuflash storage port
//!
//! Implements the `nuflash-hal` traits on top of the NuMicro flash memory
//! controller (FMC) and the Cortex-M interrupt mask:
//!
//! - M480 series (4KB pages)
//! - M031 series (512B pages)
//!
//! # Features
//!
//! - `m480` - M480 flash layout (also the default when no chip is selected)
//! - `m031` - M031 flash layout
//! - `defmt` - Enable debug formatting support
//! - `debug-log` - Forward to `nuflash-core/debug-log`
//!
//! # Usage
//!
//! ```ignore
//! let fmc = Fmc::take().unwrap();
//! let mut port = nuflash_hal_m480::env_port(fmc, uart)?;
//! let defaults = port.init();
//! ```

#![cfg_attr(not(test), no_std)]

pub mod flash;
pub mod fmc;
pub mod irq;

pub use fmc::Fmc;
pub use irq::CortexInterrupts;

// Re-export shared types from nuflash-hal
pub use nuflash_hal::{EnvPort, PortError};

use nuflash_core::config::ConfigError;
use nuflash_core::FlashPort;

/// Storage port over the on-chip flash
pub type M480Port<W> = FlashPort<Fmc, CortexInterrupts, W>;

/// Build a storage port over [`flash::ENV_GEOMETRY`] with the default ENV set
pub fn env_port<W: embedded_io::Write>(fmc: Fmc, sink: W) -> Result<M480Port<W>, ConfigError> {
    FlashPort::new(flash::ENV_GEOMETRY, fmc, CortexInterrupts::new(), sink)
}
