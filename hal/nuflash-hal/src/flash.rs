//! Flash controller abstractions
//!
//! Provides the raw operations a chip's flash controller must offer so the
//! port can erase, program and read back the medium. Implementations issue
//! one hardware operation per call and busy-wait until it completes.

/// Size of one programmable word in bytes
///
/// The controller programs naturally aligned 32-bit words.
pub const WORD_SIZE: usize = 4;

/// Errors reported by a single controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Controller flagged the operation as failed
    IspFail,
    /// Operation did not complete within the poll budget
    Timeout,
}

/// Flash controller trait
///
/// Erase and program only take effect while the controller is unlocked and
/// in program mode. Callers are expected to bracket them with
/// [`unlock`](FlashController::unlock) / [`enable_program`](FlashController::enable_program)
/// and the matching [`disable_program`](FlashController::disable_program) /
/// [`lock`](FlashController::lock).
pub trait FlashController {
    /// Minimum erasable unit in bytes
    const PAGE_SIZE: usize;

    /// Unlock protected registers and enable the controller
    fn unlock(&mut self);

    /// Disable the controller and re-lock protected registers
    fn lock(&mut self);

    /// Allow erase/program of the application flash region
    fn enable_program(&mut self);

    /// Forbid erase/program of the application flash region
    fn disable_program(&mut self);

    /// Erase the page starting at `address`
    ///
    /// `address` must be a multiple of [`PAGE_SIZE`](FlashController::PAGE_SIZE).
    fn erase_page(&mut self, address: u32) -> Result<(), ControllerError>;

    /// Program one word at `address`
    ///
    /// The target word should have been erased beforehand.
    fn program_word(&mut self, address: u32, value: u32) -> Result<(), ControllerError>;

    /// Read one word from the mapped flash address space
    fn read_word(&self, address: u32) -> u32;

    /// Read one byte from the mapped flash address space
    fn read_byte(&self, address: u32) -> u8;
}
