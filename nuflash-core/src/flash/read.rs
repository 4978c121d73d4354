//! Read path
//!
//! Flash is memory mapped, so reading needs neither a session nor any
//! alignment. Bytes are fetched one at a time in increasing address order.

use nuflash_hal::FlashController;

/// Copy `buffer.len()` bytes starting at `address` into `buffer`
pub fn read_bytes<C: FlashController>(controller: &C, address: u32, buffer: &mut [u8]) {
    for (offset, byte) in buffer.iter_mut().enumerate() {
        *byte = controller.read_byte(address + offset as u32);
    }
}
