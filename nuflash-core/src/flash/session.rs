//! Scoped controller sessions
//!
//! Erase and program need the controller unlocked and in program mode.
//! [`ControllerSession`] enters that state when it is opened and leaves it
//! when dropped, so a failing operation that returns early cannot leave the
//! controller writable.

use core::ops::{Deref, DerefMut};

use nuflash_hal::FlashController;

/// Controller held unlocked and in program mode
///
/// Derefs to the controller, so erase and program calls are issued through
/// the session.
pub struct ControllerSession<'a, C: FlashController> {
    controller: &'a mut C,
}

impl<'a, C: FlashController> ControllerSession<'a, C> {
    /// Unlock the controller and enable programming
    pub fn open(controller: &'a mut C) -> Self {
        controller.unlock();
        controller.enable_program();
        Self { controller }
    }
}

impl<C: FlashController> Deref for ControllerSession<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.controller
    }
}

impl<C: FlashController> DerefMut for ControllerSession<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.controller
    }
}

impl<C: FlashController> Drop for ControllerSession<'_, C> {
    fn drop(&mut self) {
        // Reverse order of open()
        self.controller.disable_program();
        self.controller.lock();
    }
}
