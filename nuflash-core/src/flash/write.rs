//! Write engine
//!
//! Programs word by word and reads every word back. Worn cells can fail to
//! program without the controller noticing, so the read-back comparison is
//! what decides success.

use nuflash_hal::{FlashController, PortError, WORD_SIZE};

use super::range::WriteRange;
use super::session::ControllerSession;

/// Program `data` into `range`, verifying each word after it is written
///
/// `data` holds the words in little-endian byte order and must be exactly
/// `range.len()` bytes; anything else panics before the controller is
/// touched. The target must already be erased.
///
/// Stops at the first word that the controller rejects or that reads back
/// differently, and reports it. No word after it is programmed.
pub fn program_words<C: FlashController>(
    controller: &mut C,
    range: WriteRange,
    data: &[u8],
) -> Result<(), PortError> {
    assert_eq!(
        data.len(),
        range.len(),
        "write data does not match its range at 0x{:08x}",
        range.address()
    );

    let mut session = ControllerSession::open(controller);

    for (address, chunk) in range.word_addresses().zip(data.chunks_exact(WORD_SIZE)) {
        let expected = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);

        let programmed = session.program_word(address, expected);
        let found = session.read_word(address);

        if programmed.is_err() || found != expected {
            return Err(PortError::WriteVerifyFailure {
                address,
                expected,
                found,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Op, SimFlash, SIM_BASE, SIM_GEOMETRY, SIM_PAGE_SIZE};
    use proptest::prelude::*;

    fn range(address: u32, size: usize) -> WriteRange {
        WriteRange::new(&SIM_GEOMETRY, address, size).unwrap()
    }

    #[test]
    #[should_panic(expected = "write data does not match its range")]
    fn test_short_data_rejected() {
        let mut sim = SimFlash::new();

        let _ = program_words(&mut sim, range(SIM_BASE, 8), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_write_and_verify() {
        let mut sim = SimFlash::new();
        let data = [0x01, 0x02, 0x03, 0x04, 0xA0, 0xB0, 0xC0, 0xD0];

        program_words(&mut sim, range(SIM_BASE + 16, 8), &data).unwrap();

        assert_eq!(
            sim.programmed_words(),
            [(SIM_BASE + 16, 0x0403_0201), (SIM_BASE + 20, 0xD0C0_B0A0)]
        );
        assert_eq!(&sim.mem[16..24], &data);
        assert!(sim.is_idle());
    }

    #[test]
    fn test_stuck_second_word_stops_write() {
        let mut sim = SimFlash::new();
        let data = [0xAA, 0xBB, 0xCC, 0xDD, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
        sim.stuck_word = Some((SIM_BASE + 4, u32::from_le_bytes([0x11, 0x22, 0x33, 0x99])));

        let result = program_words(&mut sim, range(SIM_BASE, 12), &data);

        assert_eq!(
            result,
            Err(PortError::WriteVerifyFailure {
                address: SIM_BASE + 4,
                expected: u32::from_le_bytes([0x11, 0x22, 0x33, 0x44]),
                found: u32::from_le_bytes([0x11, 0x22, 0x33, 0x99]),
            })
        );
        // Word 0 programmed, word 1 attempted, word 2 never touched
        assert_eq!(sim.programmed_words().len(), 2);
        assert_eq!(&sim.mem[8..12], &[0xFF; 4]);
        assert!(sim.is_idle());
    }

    #[test]
    fn test_program_onto_unerased_cells_fails_verify() {
        // Programming can only clear bits
        let mut sim = SimFlash::filled(0x0F);

        let result = program_words(&mut sim, range(SIM_BASE, 4), &[0xF0; 4]);

        assert_eq!(
            result,
            Err(PortError::WriteVerifyFailure {
                address: SIM_BASE,
                expected: 0xF0F0_F0F0,
                found: 0,
            })
        );
    }

    #[test]
    fn test_controller_failure_reported_as_verify_failure() {
        let mut sim = SimFlash::new();
        sim.fail_program_at = Some(SIM_BASE);

        let result = program_words(&mut sim, range(SIM_BASE, 4), &[0x5A; 4]);

        assert_eq!(
            result,
            Err(PortError::WriteVerifyFailure {
                address: SIM_BASE,
                expected: 0x5A5A_5A5A,
                found: 0xFFFF_FFFF,
            })
        );
        assert!(sim.is_idle());
    }

    #[test]
    fn test_empty_write() {
        let mut sim = SimFlash::new();

        program_words(&mut sim, range(SIM_BASE, 0), &[]).unwrap();

        assert!(sim.programmed_words().is_empty());
        assert_eq!(sim.count(Op::Unlock), 1);
        assert!(sim.is_idle());
    }

    proptest! {
        #[test]
        fn prop_stops_at_first_bad_word(words in 1usize..32, bad in 0usize..32, seed in any::<u32>()) {
            let bad = bad % words;
            let data: std::vec::Vec<u8> = (0..words as u32)
                .flat_map(|i| seed.wrapping_mul(i + 1).wrapping_add(i).to_le_bytes())
                .collect();
            let bad_address = SIM_BASE + (bad * WORD_SIZE) as u32;
            let bad_expected = u32::from_le_bytes(
                data[bad * WORD_SIZE..bad * WORD_SIZE + WORD_SIZE].try_into().unwrap(),
            );

            let mut sim = SimFlash::new();
            sim.stuck_word = Some((bad_address, !bad_expected));

            let result = program_words(&mut sim, range(SIM_BASE, data.len()), &data);

            prop_assert_eq!(result.map_err(|e| e.address()), Err(bad_address));
            prop_assert_eq!(sim.programmed_words().len(), bad + 1);
            prop_assert!(sim.programmed_words().iter().all(|&(a, _)| a <= bad_address));
            prop_assert!(sim.is_idle());
        }

        #[test]
        fn prop_written_bytes_read_back(
            offset in 0usize..(SIM_PAGE_SIZE / WORD_SIZE),
            data in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let len = data.len() / WORD_SIZE * WORD_SIZE;
            let address = SIM_BASE + (offset * WORD_SIZE) as u32;

            let mut sim = SimFlash::new();
            program_words(&mut sim, range(address, len), &data[..len]).unwrap();

            let mut back = std::vec![0u8; len];
            crate::flash::read_bytes(&sim, address, &mut back);
            prop_assert_eq!(&back[..], &data[..len]);
        }
    }
}
