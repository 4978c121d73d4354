//! Cache mutual exclusion
//!
//! The storage library keeps its ENV set cached in RAM. Masking interrupts
//! around every read-modify-write of that cache is the only locking the
//! port provides.

pub mod cache;

pub use cache::{CacheGuard, CacheLock};
