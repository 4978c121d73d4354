//! Interrupt masking abstraction

/// Host interrupt control
///
/// Used by the cache lock to keep interrupt handlers from touching the
/// storage library's RAM cache while it is being modified.
pub trait InterruptControl {
    /// Mask interrupts
    ///
    /// Returns `true` if interrupts were enabled before the call, so the
    /// caller can restore the previous state instead of blindly re-enabling.
    fn disable(&mut self) -> bool;

    /// Unmask interrupts
    fn enable(&mut self);
}
