// src/random.rs

//! Process-wide randomness.
//!
//! Every key, session key, salt and nonce in the workspace is drawn from the
//! operating system CSPRNG through this module. `OsRng` is a zero-sized handle
//! to the OS generator, so one instance is shared safely across threads.
//! If the OS cannot supply entropy the process panics.

use rand::rngs::OsRng;
use rand::RngCore;

/// Returns the shared OS-backed generator
pub fn rng() -> OsRng {
    OsRng
}

/// Fills `buf` with secure random bytes
///
/// # Panics
/// Panics if the operating system entropy source fails.
pub fn fill(buf: &mut [u8]) {
    if let Err(err) = OsRng.try_fill_bytes(buf) {
        panic!("OS entropy source failed: {}", err);
    }
}

/// Returns `N` secure random bytes
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    fill(&mut out);
    out
}
