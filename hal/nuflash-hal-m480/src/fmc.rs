//! Register-level driver for the NuMicro flash memory controller (FMC)
//!
//! Every ISP operation follows the same pattern: load ISPCMD/ISPADDR/ISPDAT,
//! set ISPGO, then poll until the controller clears it. A failed operation
//! raises ISPFF in ISPCTL, which is write-one-to-clear.
//!
//! FMC and SYS register writes are protected; [`Fmc::unlock`] runs the
//! REGLCTL key sequence before touching ISPCTL.

use core::cell::Cell;
use core::ptr;

use cortex_m::interrupt::{self, Mutex};
use nuflash_hal::{ControllerError, FlashController};

use crate::flash::FLASH_PAGE_SIZE;

const SYS_BASE: usize = 0x4000_0000;
const CLK_BASE: usize = 0x4000_0200;
const FMC_BASE: usize = 0x4000_C000;

const SYS_REGLCTL: Reg = Reg(SYS_BASE + 0x100);
const CLK_AHBCLK: Reg = Reg(CLK_BASE + 0x04);
const FMC_ISPCTL: Reg = Reg(FMC_BASE + 0x00);
const FMC_ISPADDR: Reg = Reg(FMC_BASE + 0x04);
const FMC_ISPDAT: Reg = Reg(FMC_BASE + 0x08);
const FMC_ISPCMD: Reg = Reg(FMC_BASE + 0x0C);
const FMC_ISPTRG: Reg = Reg(FMC_BASE + 0x10);

/// REGLCTL unlock key sequence
const REGLCTL_KEYS: [u32; 3] = [0x59, 0x16, 0x88];
/// REGLCTL reads 1 while protected registers are writable
const REGLCTL_UNLOCKED: u32 = 1;

const AHBCLK_ISPCKEN: u32 = 1 << 2;

const ISPCTL_ISPEN: u32 = 1 << 0;
const ISPCTL_APUEN: u32 = 1 << 3;
const ISPCTL_ISPFF: u32 = 1 << 6;

const ISPTRG_ISPGO: u32 = 1 << 0;

const ISPCMD_PROGRAM: u32 = 0x21;
const ISPCMD_PAGE_ERASE: u32 = 0x22;

/// Upper bound on ISPGO polls before giving up on an operation
///
/// A page erase takes a few tens of milliseconds; this covers it at the
/// highest core clock with margin.
const MAX_POLLS: u32 = 0x0200_0000;

/// Upper bound on REGLCTL key sequence attempts
const MAX_UNLOCK_ATTEMPTS: u32 = 16;

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// 32-bit memory-mapped register
#[derive(Clone, Copy)]
struct Reg(usize);

impl Reg {
    fn read(self) -> u32 {
        // SAFETY: all `Reg` constants are valid, aligned MMIO addresses
        unsafe { ptr::read_volatile(self.0 as *const u32) }
    }

    fn write(self, value: u32) {
        // SAFETY: all `Reg` constants are valid, aligned MMIO addresses
        unsafe { ptr::write_volatile(self.0 as *mut u32, value) }
    }

    fn modify(self, f: impl FnOnce(u32) -> u32) {
        self.write(f(self.read()));
    }
}

/// Handle to the flash memory controller
///
/// Only one handle exists at a time; see [`Fmc::take`].
pub struct Fmc {
    /// Set when the last REGLCTL key sequence was not accepted. ISP
    /// registers stay write-protected and ISP commands would be dropped.
    protected: bool,
}

impl Fmc {
    /// Claim the controller
    ///
    /// Returns `None` if it was already claimed. Enables the ISP clock.
    pub fn take() -> Option<Self> {
        let first = interrupt::free(|cs| !TAKEN.borrow(cs).replace(true));
        if !first {
            return None;
        }

        // SAFETY: the flag above makes this the only handle
        let fmc = unsafe { Self::steal() };
        fmc.enable_clock();
        Some(fmc)
    }

    /// Create a handle without claiming it
    ///
    /// # Safety
    ///
    /// The caller must ensure no other `Fmc` handle issues ISP commands
    /// concurrently, and that the ISP clock is enabled.
    pub unsafe fn steal() -> Self {
        Self { protected: false }
    }

    fn enable_clock(&self) {
        if !unlock_registers() {
            return;
        }
        CLK_AHBCLK.modify(|v| v | AHBCLK_ISPCKEN);
        lock_registers();
    }

    /// Fail ISP commands issued while the registers are still protected
    fn ensure_writable(&self) -> Result<(), ControllerError> {
        if self.protected {
            return Err(ControllerError::IspFail);
        }
        Ok(())
    }

    /// Run the ISP command already loaded into ISPCMD/ISPADDR/ISPDAT
    fn trigger(&mut self) -> Result<(), ControllerError> {
        FMC_ISPTRG.write(ISPTRG_ISPGO);
        cortex_m::asm::isb();

        let mut polls = 0;
        while FMC_ISPTRG.read() & ISPTRG_ISPGO != 0 {
            polls += 1;
            if polls >= MAX_POLLS {
                #[cfg(feature = "defmt")]
                defmt::warn!("fmc: ISP command timed out");
                return Err(ControllerError::Timeout);
            }
        }

        if FMC_ISPCTL.read() & ISPCTL_ISPFF != 0 {
            FMC_ISPCTL.modify(|v| v | ISPCTL_ISPFF);
            return Err(ControllerError::IspFail);
        }
        Ok(())
    }
}

/// Returns false if the key sequence was never accepted
fn unlock_registers() -> bool {
    for _ in 0..MAX_UNLOCK_ATTEMPTS {
        if SYS_REGLCTL.read() == REGLCTL_UNLOCKED {
            return true;
        }
        for key in REGLCTL_KEYS {
            SYS_REGLCTL.write(key);
        }
    }
    #[cfg(feature = "defmt")]
    defmt::warn!("fmc: register unlock sequence not accepted");
    false
}

fn lock_registers() {
    SYS_REGLCTL.write(0);
}

impl FlashController for Fmc {
    const PAGE_SIZE: usize = FLASH_PAGE_SIZE;

    fn unlock(&mut self) {
        self.protected = !unlock_registers();
        FMC_ISPCTL.modify(|v| v | ISPCTL_ISPEN);
    }

    fn lock(&mut self) {
        FMC_ISPCTL.modify(|v| v & !ISPCTL_ISPEN);
        lock_registers();
    }

    fn enable_program(&mut self) {
        FMC_ISPCTL.modify(|v| v | ISPCTL_APUEN);
    }

    fn disable_program(&mut self) {
        FMC_ISPCTL.modify(|v| v & !ISPCTL_APUEN);
    }

    fn erase_page(&mut self, address: u32) -> Result<(), ControllerError> {
        self.ensure_writable()?;
        FMC_ISPCMD.write(ISPCMD_PAGE_ERASE);
        FMC_ISPADDR.write(address);
        self.trigger()
    }

    fn program_word(&mut self, address: u32, word: u32) -> Result<(), ControllerError> {
        self.ensure_writable()?;
        FMC_ISPCMD.write(ISPCMD_PROGRAM);
        FMC_ISPADDR.write(address);
        FMC_ISPDAT.write(word);
        self.trigger()
    }

    fn read_word(&self, address: u32) -> u32 {
        // SAFETY: APROM is memory mapped and callers pass word-aligned
        // addresses inside the managed region
        unsafe { ptr::read_volatile(address as usize as *const u32) }
    }

    fn read_byte(&self, address: u32) -> u8 {
        // SAFETY: APROM is memory mapped and callers pass addresses inside
        // the managed region
        unsafe { ptr::read_volatile(address as usize as *const u8) }
    }
}
