//! `embedded-storage` NOR flash adapters
//!
//! Exposes the managed region to crates built on `embedded-storage` (for
//! example `sequential-storage`). Offsets are relative to the start of the
//! region. Unlike [`EnvPort`](nuflash_hal::EnvPort), bad ranges are
//! reported as errors here, since these traits define them as recoverable.

use embedded_io::Write;
use embedded_storage::nor_flash::{
    check_erase, check_read, check_write, ErrorType, NorFlash, NorFlashError, NorFlashErrorKind,
    ReadNorFlash,
};
use nuflash_hal::{FlashController, InterruptControl, PortError, WORD_SIZE};

use super::flash_port::FlashPort;
use crate::config::FlashGeometry;
use crate::flash::{EraseRange, RangeError, WriteRange};

/// Errors from the NOR flash adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashAccessError {
    /// Offset or length breaks read/write/erase granularity
    NotAligned,
    /// Range leaves the managed region
    OutOfBounds,
    /// The flash operation itself failed
    Port(PortError),
}

impl NorFlashError for FlashAccessError {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            Self::NotAligned => NorFlashErrorKind::NotAligned,
            Self::OutOfBounds => NorFlashErrorKind::OutOfBounds,
            Self::Port(_) => NorFlashErrorKind::Other,
        }
    }
}

impl From<NorFlashErrorKind> for FlashAccessError {
    fn from(kind: NorFlashErrorKind) -> Self {
        match kind {
            NorFlashErrorKind::NotAligned => Self::NotAligned,
            _ => Self::OutOfBounds,
        }
    }
}

impl From<RangeError> for FlashAccessError {
    fn from(err: RangeError) -> Self {
        match err {
            RangeError::Misaligned => Self::NotAligned,
            RangeError::OutOfBounds => Self::OutOfBounds,
        }
    }
}

impl From<PortError> for FlashAccessError {
    fn from(err: PortError) -> Self {
        Self::Port(err)
    }
}

/// Absolute address of a region offset
///
/// A region may end exactly at the top of the address space, where an
/// offset equal to the capacity no longer has an address.
fn absolute(geometry: &FlashGeometry, offset: u32) -> Result<u32, FlashAccessError> {
    geometry
        .base
        .checked_add(offset)
        .ok_or(FlashAccessError::OutOfBounds)
}

impl<C, I, W, const N: usize> ErrorType for FlashPort<C, I, W, N> {
    type Error = FlashAccessError;
}

impl<C, I, W, const N: usize> ReadNorFlash for FlashPort<C, I, W, N>
where
    C: FlashController,
    I: InterruptControl,
    W: Write,
{
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(self, offset, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        let address = absolute(self.geometry(), offset)?;
        self.read_range(address, bytes);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.geometry().size as usize
    }
}

impl<C, I, W, const N: usize> NorFlash for FlashPort<C, I, W, N>
where
    C: FlashController,
    I: InterruptControl,
    W: Write,
{
    const WRITE_SIZE: usize = WORD_SIZE;
    const ERASE_SIZE: usize = C::PAGE_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(self, from, to)?;
        if from == to {
            return Ok(());
        }
        let address = absolute(self.geometry(), from)?;
        let range = EraseRange::new::<C>(self.geometry(), address, (to - from) as usize)?;
        self.erase_range(range)?;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(self, offset, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        let address = absolute(self.geometry(), offset)?;
        let range = WriteRange::new(self.geometry(), address, bytes.len())?;
        self.write_range(range, bytes)?;
        Ok(())
    }
}

impl<C, I, W, const N: usize> embedded_storage_async::nor_flash::ReadNorFlash
    for FlashPort<C, I, W, N>
where
    C: FlashController,
    I: InterruptControl,
    W: Write,
{
    const READ_SIZE: usize = <Self as ReadNorFlash>::READ_SIZE;

    async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        ReadNorFlash::read(self, offset, bytes)
    }

    fn capacity(&self) -> usize {
        ReadNorFlash::capacity(self)
    }
}

impl<C, I, W, const N: usize> embedded_storage_async::nor_flash::NorFlash for FlashPort<C, I, W, N>
where
    C: FlashController,
    I: InterruptControl,
    W: Write,
{
    const WRITE_SIZE: usize = <Self as NorFlash>::WRITE_SIZE;
    const ERASE_SIZE: usize = <Self as NorFlash>::ERASE_SIZE;

    async fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        NorFlash::erase(self, from, to)
    }

    async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        NorFlash::write(self, offset, bytes)
    }
}
