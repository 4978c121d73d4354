//! Interrupt control through the Cortex-M PRIMASK register

use cortex_m::register::primask;
use nuflash_hal::InterruptControl;

/// Masks all configurable-priority interrupts via PRIMASK
#[derive(Debug, Default)]
pub struct CortexInterrupts {
    _private: (),
}

impl CortexInterrupts {
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterruptControl for CortexInterrupts {
    fn disable(&mut self) -> bool {
        let were_enabled = primask::read().is_active();
        cortex_m::interrupt::disable();
        were_enabled
    }

    fn enable(&mut self) {
        // SAFETY: only called to undo a matching `disable` that found
        // interrupts enabled
        unsafe { cortex_m::interrupt::enable() }
    }
}
