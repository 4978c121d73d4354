//! Storage port
//!
//! [`FlashPort`] ties the engines, the cache lock and the diagnostic channel
//! together behind the [`EnvPort`](nuflash_hal::EnvPort) contract, and also
//! exposes the managed region through the `embedded-storage` NOR flash
//! traits.

pub mod flash_port;
pub mod nor;

pub use flash_port::FlashPort;
pub use nor::FlashAccessError;
