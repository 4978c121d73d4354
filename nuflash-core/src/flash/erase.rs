//! Erase engine
//!
//! Erases whole pages. A request smaller than a page still erases the full
//! page it starts in.

use nuflash_hal::{FlashController, PortError};

use super::range::EraseRange;
use super::session::ControllerSession;

/// Erase every page of `range`, lowest address first
///
/// Stops at the first page the controller fails to erase and reports its
/// address. Pages before it stay erased; pages after it are not touched.
pub fn erase_pages<C: FlashController>(
    controller: &mut C,
    range: EraseRange,
) -> Result<(), PortError> {
    let mut session = ControllerSession::open(controller);

    for address in range.page_addresses() {
        session
            .erase_page(address)
            .map_err(|_| PortError::EraseFailure { address })?;
    }

    Ok(())
}
