//! Flash region geometry
//!
//! The storage library owns a contiguous, page-aligned slice of the flash
//! address space. Every address the port accepts must fall inside it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nuflash_hal::FlashController;

/// Problems with a [`FlashGeometry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Region has zero length
    Empty,
    /// Region does not start on a page boundary
    BaseMisaligned,
    /// Region length is not a whole number of pages
    SizeMisaligned,
    /// Region runs past the 32-bit address space
    Overflow,
}

/// Flash region managed by the port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlashGeometry {
    /// Absolute address of the first byte
    pub base: u32,
    /// Region length in bytes
    pub size: u32,
}

impl FlashGeometry {
    /// Create a new region description
    pub const fn new(base: u32, size: u32) -> Self {
        Self { base, size }
    }

    /// One past the last address, widened so it cannot wrap
    pub const fn end(&self) -> u64 {
        self.base as u64 + self.size as u64
    }

    /// Check whether `[address, address + len)` lies inside the region
    ///
    /// An empty span is inside if it starts anywhere from `base` to `end`.
    pub fn contains(&self, address: u32, len: u64) -> bool {
        address >= self.base && u64::from(address) + len <= self.end()
    }

    /// Number of pages covered for a controller with the given page size
    pub fn pages<C: FlashController>(&self) -> usize {
        self.size as usize / C::PAGE_SIZE
    }

    /// Check the region against a controller's erase granularity
    pub fn validate<C: FlashController>(&self) -> Result<(), GeometryError> {
        let page = C::PAGE_SIZE as u64;

        if self.size == 0 {
            return Err(GeometryError::Empty);
        }
        if self.end() > u64::from(u32::MAX) + 1 {
            return Err(GeometryError::Overflow);
        }
        if u64::from(self.base) % page != 0 {
            return Err(GeometryError::BaseMisaligned);
        }
        if u64::from(self.size) % page != 0 {
            return Err(GeometryError::SizeMisaligned);
        }
        Ok(())
    }
}
