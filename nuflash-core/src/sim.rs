//! Simulated hardware for host tests
//!
//! `SimFlash` behaves like NOR flash behind a lockable controller: erase
//! sets a page to 0xFF, programming can only clear bits, and erase/program
//! panic unless the controller is unlocked and in program mode.

use std::vec::Vec;

use nuflash_hal::{ControllerError, FlashController, InterruptControl};

use crate::config::FlashGeometry;

/// Page size of the simulated part
pub const SIM_PAGE_SIZE: usize = 256;

/// Number of pages in the simulated part
pub const SIM_PAGES: usize = 16;

/// Start address of the simulated part
pub const SIM_BASE: u32 = 0x1000;

/// Geometry covering the whole simulated part
pub const SIM_GEOMETRY: FlashGeometry =
    FlashGeometry::new(SIM_BASE, (SIM_PAGE_SIZE * SIM_PAGES) as u32);

/// Controller operation as seen by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Unlock,
    Lock,
    EnableProgram,
    DisableProgram,
    Erase(u32),
    Program(u32, u32),
}

pub struct SimFlash {
    pub mem: Vec<u8>,
    pub ops: Vec<Op>,
    pub unlocked: bool,
    pub program_enabled: bool,
    /// Erase of this page reports a controller failure
    pub fail_erase_at: Option<u32>,
    /// Programming this word reports a controller failure
    pub fail_program_at: Option<u32>,
    /// Reads of this word return the given value (stuck cells)
    pub stuck_word: Option<(u32, u32)>,
}

impl SimFlash {
    /// Fresh part with every byte erased
    pub fn new() -> Self {
        Self {
            mem: vec![0xFF; SIM_PAGE_SIZE * SIM_PAGES],
            ops: Vec::new(),
            unlocked: false,
            program_enabled: false,
            fail_erase_at: None,
            fail_program_at: None,
            stuck_word: None,
        }
    }

    /// Part with every byte programmed to `value`
    pub fn filled(value: u8) -> Self {
        let mut sim = Self::new();
        sim.mem.fill(value);
        sim
    }

    fn index(address: u32) -> usize {
        assert!(address >= SIM_BASE, "address 0x{:x} below simulated flash", address);
        let index = (address - SIM_BASE) as usize;
        assert!(index < SIM_PAGE_SIZE * SIM_PAGES, "address 0x{:x} past simulated flash", address);
        index
    }

    pub fn erased_pages(&self) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Erase(address) => Some(address),
                _ => None,
            })
            .collect()
    }

    pub fn programmed_words(&self) -> Vec<(u32, u32)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Program(address, value) => Some((address, value)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: Op) -> usize {
        self.ops.iter().filter(|op| **op == wanted).count()
    }

    /// True when the controller is back in its locked, read-only state
    pub fn is_idle(&self) -> bool {
        !self.unlocked && !self.program_enabled
    }

    fn check_writable(&self) {
        assert!(self.unlocked, "controller used while locked");
        assert!(self.program_enabled, "controller used outside program mode");
    }
}

impl FlashController for SimFlash {
    const PAGE_SIZE: usize = SIM_PAGE_SIZE;

    fn unlock(&mut self) {
        self.ops.push(Op::Unlock);
        self.unlocked = true;
    }

    fn lock(&mut self) {
        self.ops.push(Op::Lock);
        self.unlocked = false;
    }

    fn enable_program(&mut self) {
        assert!(self.unlocked, "program mode needs unlocked registers");
        self.ops.push(Op::EnableProgram);
        self.program_enabled = true;
    }

    fn disable_program(&mut self) {
        self.ops.push(Op::DisableProgram);
        self.program_enabled = false;
    }

    fn erase_page(&mut self, address: u32) -> Result<(), ControllerError> {
        self.check_writable();
        self.ops.push(Op::Erase(address));
        if self.fail_erase_at == Some(address) {
            return Err(ControllerError::IspFail);
        }
        let start = Self::index(address);
        self.mem[start..start + SIM_PAGE_SIZE].fill(0xFF);
        Ok(())
    }

    fn program_word(&mut self, address: u32, value: u32) -> Result<(), ControllerError> {
        self.check_writable();
        self.ops.push(Op::Program(address, value));
        if self.fail_program_at == Some(address) {
            return Err(ControllerError::IspFail);
        }
        let start = Self::index(address);
        for (cell, byte) in self.mem[start..start + 4].iter_mut().zip(value.to_le_bytes()) {
            *cell &= byte;
        }
        Ok(())
    }

    fn read_word(&self, address: u32) -> u32 {
        if let Some((stuck, value)) = self.stuck_word {
            if stuck == address {
                return value;
            }
        }
        let start = Self::index(address);
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.mem[start..start + 4]);
        u32::from_le_bytes(word)
    }

    fn read_byte(&self, address: u32) -> u8 {
        self.mem[Self::index(address)]
    }
}

/// Interrupt controller that records its mask state
pub struct MockIrq {
    pub enabled: bool,
    pub disables: usize,
    pub enables: usize,
}

impl MockIrq {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            disables: 0,
            enables: 0,
        }
    }
}

impl InterruptControl for MockIrq {
    fn disable(&mut self) -> bool {
        self.disables += 1;
        let was_enabled = self.enabled;
        self.enabled = false;
        was_enabled
    }

    fn enable(&mut self) {
        self.enables += 1;
        self.enabled = true;
    }
}

/// Character output collecting everything written to it
#[derive(Default)]
pub struct Sink(pub Vec<u8>);

impl Sink {
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap()
    }
}

impl embedded_io::ErrorType for Sink {
    type Error = core::convert::Infallible;
}

impl embedded_io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Character output whose every write fails
pub struct BrokenSink;

impl embedded_io::ErrorType for BrokenSink {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(embedded_io::ErrorKind::Other)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
