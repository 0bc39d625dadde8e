//! # Command-Interest Preparation
//!
//! Signed command interests carry a timestamp and a nonce in their name so a
//! receiver can reject replays. The timestamp is strictly monotonic per
//! generator even when the wall clock stalls or steps backwards; the nonce
//! is fresh randomness on every call.

use crate::ports::time::TimeSource;
use ndt_types::{Name, NameComponent};
use rand::RngCore;
use std::sync::{Arc, Mutex};

/// Number of random nonce bytes appended to a command-interest name.
pub const NONCE_LEN: usize = 8;

/// Strictly increasing millisecond stamp source.
///
/// Each stamp is the wall clock when the clock has advanced past the last
/// stamp, and last-stamp-plus-one otherwise. The lock guards only the
/// compare-and-bump; it is never held across I/O.
#[derive(Default)]
pub struct MonotonicStamp {
    last: Mutex<u64>,
}

impl MonotonicStamp {
    /// Fresh stamp source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next stamp given the current wall-clock millisecond.
    pub fn next(&self, now_ms: u64) -> u64 {
        let mut last = self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let stamp = now_ms.max(*last + 1);
        *last = stamp;
        stamp
    }
}

/// Appends replay-protection components to command-interest names.
pub struct CommandInterestGenerator {
    stamp: MonotonicStamp,
    time: Arc<dyn TimeSource>,
}

impl CommandInterestGenerator {
    /// Generator driven by the given clock.
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self {
            stamp: MonotonicStamp::new(),
            time,
        }
    }

    /// Append the timestamp and nonce components to `name`.
    ///
    /// The stamp is spent even if the caller later abandons the interest;
    /// gaps in the sequence are expected.
    pub fn prepare(&self, name: &Name) -> Name {
        let stamp = self.stamp.next(self.time.now_ms());
        let mut nonce = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let mut prepared = name.clone();
        prepared.push(NameComponent::from_nonneg_int(stamp));
        prepared.push(NameComponent::new(nonce.to_vec()));
        prepared
    }
}
