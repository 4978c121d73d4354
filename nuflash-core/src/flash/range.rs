//! Alignment validation
//!
//! Ranges coming from the storage library are checked once, when they are
//! turned into an [`EraseRange`] or [`WriteRange`]. The engines only accept
//! these types, so they never see a misaligned or out-of-region request.

use nuflash_hal::{FlashController, WORD_SIZE};

use crate::config::FlashGeometry;

/// Reasons a byte range cannot be handed to the engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeError {
    /// Address or size breaks the erase/write granularity
    Misaligned,
    /// Range leaves the managed flash region
    OutOfBounds,
}

/// Check that `address` starts an erase unit
pub fn is_erase_aligned(address: u32, page_size: usize) -> bool {
    u64::from(address) % page_size as u64 == 0
}

/// Check that `size` is a whole number of words
pub fn is_write_aligned(size: usize, word_size: usize) -> bool {
    size % word_size == 0
}

/// Pages needed to cover `size` bytes, rounding up
pub fn page_count(size: usize, page_size: usize) -> usize {
    size.div_ceil(page_size)
}

/// A validated erase request
///
/// Starts on a page boundary and covers whole pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EraseRange {
    address: u32,
    pages: usize,
    page_size: u32,
}

impl EraseRange {
    /// Validate an erase of `size` bytes at `address`
    ///
    /// The size is rounded up to whole pages, and the rounded span must stay
    /// inside `geometry`.
    pub fn new<C: FlashController>(
        geometry: &FlashGeometry,
        address: u32,
        size: usize,
    ) -> Result<Self, RangeError> {
        if !is_erase_aligned(address, C::PAGE_SIZE) {
            return Err(RangeError::Misaligned);
        }

        let pages = page_count(size, C::PAGE_SIZE);
        let span = pages as u64 * C::PAGE_SIZE as u64;
        if !geometry.contains(address, span) {
            return Err(RangeError::OutOfBounds);
        }

        Ok(Self {
            address,
            pages,
            page_size: C::PAGE_SIZE as u32,
        })
    }

    /// First page address
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Number of pages to erase
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Start address of every page, in increasing order
    pub fn page_addresses(&self) -> impl Iterator<Item = u32> {
        let (start, step) = (self.address, self.page_size);
        (0..self.pages as u32).map(move |i| start + i * step)
    }
}

/// A validated write request
///
/// Starts on a word boundary and covers whole words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteRange {
    address: u32,
    words: usize,
}

impl WriteRange {
    /// Validate a write of `size` bytes at `address`
    pub fn new(geometry: &FlashGeometry, address: u32, size: usize) -> Result<Self, RangeError> {
        if !is_write_aligned(size, WORD_SIZE) || !is_write_aligned(address as usize, WORD_SIZE) {
            return Err(RangeError::Misaligned);
        }
        if !geometry.contains(address, size as u64) {
            return Err(RangeError::OutOfBounds);
        }

        Ok(Self {
            address,
            words: size / WORD_SIZE,
        })
    }

    /// First word address
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Number of words to program
    pub fn words(&self) -> usize {
        self.words
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.words * WORD_SIZE
    }

    /// True for a zero-length write
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Address of every word, in increasing order
    pub fn word_addresses(&self) -> impl Iterator<Item = u32> {
        let start = self.address;
        (0..self.words as u32).map(move |i| start + i * WORD_SIZE as u32)
    }
}
