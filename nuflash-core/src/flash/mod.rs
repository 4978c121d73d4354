//! Flash adaptation engines
//!
//! Translate byte ranges from the storage library into controller page and
//! word operations:
//!
//! - Range validation against erase and write granularity
//! - Scoped controller sessions (unlock and program mode)
//! - Page erase, verified word program and mapped reads

pub mod erase;
pub mod range;
pub mod read;
pub mod session;
pub mod write;

pub use erase::erase_pages;
pub use range::{EraseRange, RangeError, WriteRange};
pub use read::read_bytes;
pub use session::ControllerSession;
pub use write::program_words;
