//! Stable hashing used by the vldb-4 on-disk hash tables.
//!
//! Goals:
//! - Reproduce the exact polynomial the vlserver used when it placed
//!   records into buckets; any deviation makes every lookup miss.
//! - Keep both functions pure so bucket mapping is invariant across
//!   toolchains/platforms.

use crate::consts::HASH_SIZE;
use anyhow::{anyhow, Result};

/// Bucket index for a volume name.
///
/// The original walks the name backwards with a 32-bit accumulator:
/// `acc = acc * 63 + (byte - 63) (mod 2^32)`, then takes the result
/// mod 8191. Characters above U+00FF cannot have participated in the
/// placement and are rejected before any I/O.
pub fn hash_name(name: &str) -> Result<u32> {
    let mut acc: u32 = 0;
    for c in name.chars().rev() {
        let v = c as u32;
        if v > 255 {
            return Err(anyhow!("non-single-byte char {:?} in volume name", c));
        }
        acc = acc.wrapping_mul(63).wrapping_add(v.wrapping_sub(63));
    }
    Ok(acc % HASH_SIZE as u32)
}

/// Bucket index for a volume id (plain modulo).
#[inline]
pub fn hash_id(volid: u32) -> u32 {
    volid % HASH_SIZE as u32
}
