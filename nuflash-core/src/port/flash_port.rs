//! Flash port implementation
//!
//! Implements [`EnvPort`] on top of the engines. Boundary checks happen
//! here: a misaligned or out-of-region request from the storage library is
//! a layout bug in the library and panics instead of returning an error.

use core::fmt;

use embedded_io::Write;
use nuflash_hal::{EnvEntry, EnvPort, FlashController, InterruptControl, OperationResult};

use crate::config::{has_unique_keys, ConfigError, FlashGeometry, DEFAULT_ENV};
use crate::diag::{Diagnostics, LOG_BUF_SIZE};
use crate::flash::{erase_pages, program_words, read_bytes, EraseRange, RangeError, WriteRange};
use crate::lock::CacheLock;

/// Storage port for one flash region
///
/// Owns the flash controller, the interrupt control used by the cache lock
/// and the diagnostic sink. `N` is the diagnostic buffer capacity.
pub struct FlashPort<C, I, W, const N: usize = LOG_BUF_SIZE> {
    geometry: FlashGeometry,
    controller: C,
    cache: CacheLock<I>,
    diag: Diagnostics<W, N>,
    defaults: &'static [EnvEntry],
}

impl<C, I, W, const N: usize> FlashPort<C, I, W, N>
where
    C: FlashController,
    I: InterruptControl,
    W: Write,
{
    /// Create a port with the board's default ENV set
    pub fn new(geometry: FlashGeometry, controller: C, irq: I, sink: W) -> Result<Self, ConfigError> {
        Self::with_defaults(geometry, controller, irq, sink, DEFAULT_ENV)
    }

    /// Create a port with a custom default ENV set
    pub fn with_defaults(
        geometry: FlashGeometry,
        controller: C,
        irq: I,
        sink: W,
        defaults: &'static [EnvEntry],
    ) -> Result<Self, ConfigError> {
        geometry.validate::<C>()?;
        if !has_unique_keys(defaults) {
            return Err(ConfigError::DuplicateEnvKey);
        }

        Ok(Self {
            geometry,
            controller,
            cache: CacheLock::new(irq),
            diag: Diagnostics::new(sink),
            defaults,
        })
    }

    /// Flash region managed by this port
    pub fn geometry(&self) -> &FlashGeometry {
        &self.geometry
    }

    /// Access the flash controller
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Access the flash controller mutably
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Access the diagnostic channel
    pub fn diagnostics(&self) -> &Diagnostics<W, N> {
        &self.diag
    }

    /// Access the cache lock
    pub fn cache(&self) -> &CacheLock<I> {
        &self.cache
    }

    /// Check if the cache lock is held
    pub fn is_locked(&self) -> bool {
        self.cache.is_locked()
    }

    /// Tear the port down, returning its parts
    pub fn release(self) -> (C, I, W) {
        (self.controller, self.cache.release(), self.diag.into_sink())
    }

    pub(crate) fn read_range(&mut self, address: u32, buffer: &mut [u8]) {
        read_bytes(&self.controller, address, buffer);
    }

    pub(crate) fn erase_range(&mut self, range: EraseRange) -> OperationResult {
        erase_pages(&mut self.controller, range).inspect_err(|_err| {
            self.diag.print(format_args!("\r\nErase Error!!!"));
            #[cfg(feature = "defmt")]
            defmt::warn!("flash port: {}", _err);
        })
    }

    pub(crate) fn write_range(&mut self, range: WriteRange, data: &[u8]) -> OperationResult {
        program_words(&mut self.controller, range, data).inspect_err(|_err| {
            self.diag.print(format_args!("\r\nWrite Error!!!"));
            #[cfg(feature = "defmt")]
            defmt::warn!("flash port: {}", _err);
        })
    }
}

#[cold]
#[track_caller]
fn contract_violation(op: &str, address: u32, size: usize, err: RangeError) -> ! {
    panic!(
        "{} of {} bytes at 0x{:08x} breaks the flash layout contract: {:?}",
        op, size, address, err
    )
}

impl<C, I, W, const N: usize> EnvPort for FlashPort<C, I, W, N>
where
    C: FlashController,
    I: InterruptControl,
    W: Write,
{
    fn init(&mut self) -> &'static [EnvEntry] {
        #[cfg(feature = "defmt")]
        defmt::debug!("flash port: {} default ENV entries", self.defaults.len());
        self.diag.debug(
            file!(),
            line!(),
            format_args!("default ENV: {} entries", self.defaults.len()),
        );
        self.defaults
    }

    #[track_caller]
    fn read(&mut self, address: u32, buffer: &mut [u8]) -> OperationResult {
        if !self.geometry.contains(address, buffer.len() as u64) {
            contract_violation("read", address, buffer.len(), RangeError::OutOfBounds);
        }

        self.diag.debug(
            file!(),
            line!(),
            format_args!("read 0x{:08x}, {}", address, buffer.len()),
        );
        self.read_range(address, buffer);
        self.diag.dump(buffer);

        Ok(())
    }

    #[track_caller]
    fn erase(&mut self, address: u32, size: usize) -> OperationResult {
        let range = EraseRange::new::<C>(&self.geometry, address, size)
            .unwrap_or_else(|err| contract_violation("erase", address, size, err));

        self.diag.debug(
            file!(),
            line!(),
            format_args!("erase 0x{:08x}, {}, {} pages", address, size, range.pages()),
        );
        self.erase_range(range)
    }

    #[track_caller]
    fn write(&mut self, address: u32, data: &[u8]) -> OperationResult {
        let range = WriteRange::new(&self.geometry, address, data.len())
            .unwrap_or_else(|err| contract_violation("write", address, data.len(), err));

        self.diag.debug(
            file!(),
            line!(),
            format_args!("write 0x{:08x}, {}", address, data.len()),
        );
        self.write_range(range, data)
    }

    #[track_caller]
    fn lock(&mut self) {
        self.cache.lock();
    }

    #[track_caller]
    fn unlock(&mut self) {
        self.cache.unlock();
    }

    fn log_debug(&mut self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.diag.debug(file, line, args);
    }

    fn log_info(&mut self, args: fmt::Arguments<'_>) {
        self.diag.info(args);
    }

    fn print(&mut self, args: fmt::Arguments<'_>) {
        self.diag.print(args);
    }
}
