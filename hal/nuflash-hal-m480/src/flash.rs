//! Flash layout for NuMicro parts
//!
//! The ENV region sits at the top of APROM so that application images can
//! grow upwards from address 0 without touching it.

use nuflash_core::FlashGeometry;

/// APROM size and page size for M031 (M031xG)
#[cfg(feature = "m031")]
pub const FLASH_SIZE: u32 = 128 * 1024;
#[cfg(feature = "m031")]
pub const FLASH_PAGE_SIZE: usize = 512;

/// APROM size and page size for M480 (M487/M484)
#[cfg(not(feature = "m031"))]
pub const FLASH_SIZE: u32 = 512 * 1024;
#[cfg(not(feature = "m031"))]
pub const FLASH_PAGE_SIZE: usize = 4096;

/// APROM is mapped at address 0
pub const FLASH_BASE: u32 = 0x0000_0000;

/// Bytes reserved for the ENV region
pub const ENV_PARTITION_SIZE: u32 = 16 * 1024;

pub const ENV_PARTITION_START: u32 = FLASH_BASE + FLASH_SIZE - ENV_PARTITION_SIZE;

/// Region handed to the storage library
pub const ENV_GEOMETRY: FlashGeometry = FlashGeometry::new(ENV_PARTITION_START, ENV_PARTITION_SIZE);
