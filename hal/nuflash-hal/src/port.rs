//! Storage port contract
//!
//! The storage library never touches flash or interrupts directly. It calls
//! the operations of [`EnvPort`] and nothing else, so moving the library to
//! a different chip means providing a different implementation of this
//! trait.

use core::fmt;

/// A default ENV entry
///
/// The set of defaults is built at compile time and handed to the storage
/// library once, during [`EnvPort::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvEntry {
    /// ENV key
    pub key: &'static str,
    /// Value written when the key is first created
    pub value: &'static str,
}

impl EnvEntry {
    /// Create a new entry
    pub const fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }
}

/// Errors from port flash operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// A page erase failed; pages before it were erased
    EraseFailure {
        /// Start address of the failing page
        address: u32,
    },
    /// A programmed word did not read back as written; words before it
    /// were programmed, no word after it was touched
    WriteVerifyFailure {
        /// Address of the failing word
        address: u32,
        /// Value that was programmed
        expected: u32,
        /// Value read back from flash
        found: u32,
    },
}

impl PortError {
    /// Address of the page or word that failed
    pub fn address(&self) -> u32 {
        match *self {
            PortError::EraseFailure { address } => address,
            PortError::WriteVerifyFailure { address, .. } => address,
        }
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PortError::EraseFailure { address } => {
                write!(f, "erase failed at 0x{:08x}", address)
            }
            PortError::WriteVerifyFailure {
                address,
                expected,
                found,
            } => write!(
                f,
                "write verify failed at 0x{:08x}: wrote 0x{:08x}, read 0x{:08x}",
                address, expected, found
            ),
        }
    }
}

/// Outcome of a port flash operation
pub type OperationResult = Result<(), PortError>;

/// Port contract consumed by the storage library
///
/// Addresses are absolute flash addresses. Alignment preconditions are part
/// of the contract: a caller that violates them has a layout bug, and
/// implementations are free to treat it as fatal.
pub trait EnvPort {
    /// Return the default ENV set
    ///
    /// Never fails. The slice length is the entry count.
    fn init(&mut self) -> &'static [EnvEntry];

    /// Copy `buffer.len()` bytes starting at `address` into `buffer`
    fn read(&mut self, address: u32, buffer: &mut [u8]) -> OperationResult;

    /// Erase whole pages covering `[address, address + size)`
    ///
    /// `address` must be page aligned. The last page is erased entirely
    /// even when `size` ends inside it.
    fn erase(&mut self, address: u32, size: usize) -> OperationResult;

    /// Program `data` into previously erased flash at `address`
    ///
    /// `data.len()` must be a multiple of [`WORD_SIZE`](crate::WORD_SIZE).
    /// Every word is read back and compared.
    fn write(&mut self, address: u32, data: &[u8]) -> OperationResult;

    /// Enter the cache critical section
    fn lock(&mut self);

    /// Leave the cache critical section
    fn unlock(&mut self);

    /// Emit a debug trace tagged with its origin
    fn log_debug(&mut self, file: &str, line: u32, args: fmt::Arguments<'_>);

    /// Emit an informational message
    fn log_info(&mut self, args: fmt::Arguments<'_>);

    /// Emit a message without any prefix
    fn print(&mut self, args: fmt::Arguments<'_>);
}

/// Emit a debug trace through an [`EnvPort`], tagged with the call site
#[macro_export]
macro_rules! port_debug {
    ($port:expr, $($arg:tt)*) => {{
        use $crate::EnvPort as _;
        $port.log_debug(::core::file!(), ::core::line!(), ::core::format_args!($($arg)*))
    }};
}

/// Emit an informational message through an [`EnvPort`]
#[macro_export]
macro_rules! port_info {
    ($port:expr, $($arg:tt)*) => {{
        use $crate::EnvPort as _;
        $port.log_info(::core::format_args!($($arg)*))
    }};
}

/// Emit an unprefixed message through an [`EnvPort`]
#[macro_export]
macro_rules! port_print {
    ($port:expr, $($arg:tt)*) => {{
        use $crate::EnvPort as _;
        $port.print(::core::format_args!($($arg)*))
    }};
}
