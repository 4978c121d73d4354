//! Diagnostic output
//!
//! Formats port messages into a bounded buffer and forwards them to the
//! host's character output.

pub mod channel;

pub use channel::{Diagnostics, LOG_BUF_SIZE};
