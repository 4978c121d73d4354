//! Interrupt-masking cache lock

use nuflash_hal::InterruptControl;

/// Cache lock built on interrupt masking
///
/// Not reentrant. Locking twice without unlocking, or unlocking while not
/// locked, is a caller bug and panics. Unlocking restores the interrupt
/// state from before the lock, so locking from a context that already runs
/// with interrupts masked leaves them masked.
pub struct CacheLock<I> {
    irq: I,
    /// `Some(were_enabled)` while held
    held: Option<bool>,
}

impl<I: InterruptControl> CacheLock<I> {
    /// Create an unlocked cache lock
    pub fn new(irq: I) -> Self {
        Self { irq, held: None }
    }

    /// Mask interrupts and take the lock
    #[track_caller]
    pub fn lock(&mut self) {
        assert!(self.held.is_none(), "cache lock is not reentrant");
        let were_enabled = self.irq.disable();
        self.held = Some(were_enabled);
    }

    /// Release the lock and restore the previous interrupt state
    #[track_caller]
    pub fn unlock(&mut self) {
        match self.held.take() {
            Some(true) => self.irq.enable(),
            Some(false) => {}
            None => panic!("cache lock released while not held"),
        }
    }

    /// Take the lock for the lifetime of the returned guard
    pub fn guard(&mut self) -> CacheGuard<'_, I> {
        self.lock();
        CacheGuard { lock: self }
    }

    /// Check if the lock is held
    pub fn is_locked(&self) -> bool {
        self.held.is_some()
    }

    /// Access the interrupt controller
    pub fn irq(&self) -> &I {
        &self.irq
    }

    /// Give back the interrupt controller
    ///
    /// Releases the lock first if it is still held.
    pub fn release(mut self) -> I {
        if self.is_locked() {
            self.unlock();
        }
        self.irq
    }
}

/// Held cache lock, released on drop
pub struct CacheGuard<'a, I: InterruptControl> {
    lock: &'a mut CacheLock<I>,
}

impl<I: InterruptControl> Drop for CacheGuard<'_, I> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MockIrq;

    #[test]
    fn test_lock_masks_and_unlock_restores() {
        let mut lock = CacheLock::new(MockIrq::new(true));

        lock.lock();
        assert!(lock.is_locked());
        assert!(!lock.irq().enabled);

        lock.unlock();
        assert!(!lock.is_locked());
        assert!(lock.irq().enabled);
        assert_eq!(lock.irq().disables, 1);
        assert_eq!(lock.irq().enables, 1);
    }

    #[test]
    fn test_lock_from_masked_context_stays_masked() {
        let mut lock = CacheLock::new(MockIrq::new(false));

        lock.lock();
        lock.unlock();

        assert!(!lock.irq().enabled);
        assert_eq!(lock.irq().enables, 0);
    }

    #[test]
    fn test_repeated_cycles_do_not_drift() {
        let mut lock = CacheLock::new(MockIrq::new(true));

        for _ in 0..5 {
            lock.lock();
            lock.unlock();
        }

        assert!(lock.irq().enabled);
        assert_eq!(lock.irq().disables, 5);
        assert_eq!(lock.irq().enables, 5);
    }

    #[test]
    #[should_panic(expected = "not reentrant")]
    fn test_nested_lock_rejected() {
        let mut lock = CacheLock::new(MockIrq::new(true));
        lock.lock();
        lock.lock();
    }

    #[test]
    #[should_panic(expected = "while not held")]
    fn test_unlock_without_lock_rejected() {
        let mut lock = CacheLock::new(MockIrq::new(true));
        lock.unlock();
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let mut lock = CacheLock::new(MockIrq::new(true));
        {
            let _guard = lock.guard();
        }
        assert!(!lock.is_locked());
        assert!(lock.irq().enabled);
    }

    #[test]
    fn test_release_unlocks() {
        let mut lock = CacheLock::new(MockIrq::new(true));
        lock.lock();

        let irq = lock.release();
        assert!(irq.enabled);
    }
}
