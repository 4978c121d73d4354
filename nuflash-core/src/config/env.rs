//! Default ENV set
//!
//! Values the storage library writes the first time it formats its ENV
//! area. Built at compile time, handed out once, never modified.

use nuflash_hal::EnvEntry;

/// Default ENV entries for this board
pub const DEFAULT_ENV: &[EnvEntry] = &[
    EnvEntry::new("startup_times", "0"),
    EnvEntry::new("pressed_times", "0"),
];

/// Check that no key appears twice
pub fn has_unique_keys(entries: &[EnvEntry]) -> bool {
    entries
        .iter()
        .enumerate()
        .all(|(i, entry)| entries[i + 1..].iter().all(|other| other.key != entry.key))
}
