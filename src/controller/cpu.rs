use ring::pbkdf2;
use std::hint::black_box;
use std::num::NonZeroU32;

use crate::domain::Deadline;

const SECRET: &[u8] = b"x";
const SALT: &[u8] = b"y";
const KEY_LEN: usize = 64;

/// A CPU burn unit: PBKDF2-HMAC-SHA512 derivations back to back until the deadline.
///
/// Key derivation has a fixed cost per call and no early exit, so each
/// iteration keeps one core busy for a predictable stretch. The loop never
/// yields; it is meant to run on its own OS thread.
#[derive(Debug, Clone, Copy)]
pub struct BurnWorker {
    iterations: NonZeroU32,
}

impl BurnWorker {
    pub fn new(kdf_iterations: u32) -> Self {
        Self {
            iterations: NonZeroU32::new(kdf_iterations).unwrap_or(NonZeroU32::MIN),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// One full derivation.
    pub fn derive_once(&self) -> [u8; KEY_LEN] {
        let mut out = [0u8; KEY_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA512,
            self.iterations,
            SALT,
            SECRET,
            &mut out,
        );
        out
    }

    /// Burn until `deadline`, returning how many derivations ran.
    ///
    /// A derivation in flight when the deadline passes is allowed to finish.
    pub fn run(self, deadline: Deadline) -> u64 {
        let mut rounds = 0u64;
        while !deadline.reached() {
            black_box(self.derive_once());
            rounds += 1;
        }
        rounds
    }
}
