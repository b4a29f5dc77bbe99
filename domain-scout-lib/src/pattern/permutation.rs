//! Keyed pseudo-random permutation of `[0, n)`.
//!
//! A balanced Feistel network over the smallest even-width power-of-two
//! domain covering `n`, with cycle-walking to stay inside the range. Needs
//! O(1) memory regardless of `n` and visits every index exactly once.

use rand::Rng;

const ROUNDS: usize = 6;

/// Bijection on `[0, len)` chosen by a random key.
#[derive(Debug, Clone)]
pub struct FeistelPermutation {
    len: u128,
    half_bits: u32,
    half_mask: u128,
    keys: [u64; ROUNDS],
}

impl FeistelPermutation {
    /// Build a permutation of `[0, len)` keyed from `rng`.
    pub fn new<R: Rng + ?Sized>(len: u128, rng: &mut R) -> Self {
        // Bits needed to represent len - 1, at least 2, rounded up to even.
        let needed = (128 - len.saturating_sub(1).leading_zeros()).max(2);
        let total_bits = needed + (needed % 2);
        let half_bits = total_bits / 2;
        let half_mask = if half_bits >= 64 {
            u64::MAX as u128
        } else {
            (1u128 << half_bits) - 1
        };

        let mut keys = [0u64; ROUNDS];
        for key in keys.iter_mut() {
            *key = rng.gen();
        }

        Self {
            len,
            half_bits,
            half_mask,
            keys,
        }
    }

    pub fn len(&self) -> u128 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Map `index` (which must be `< len`) to its permuted position.
    pub fn permute(&self, index: u128) -> u128 {
        debug_assert!(index < self.len);
        let mut value = self.encrypt(index);
        while value >= self.len {
            value = self.encrypt(value);
        }
        value
    }

    fn encrypt(&self, value: u128) -> u128 {
        let mut left = (value >> self.half_bits) & self.half_mask;
        let mut right = value & self.half_mask;
        for key in &self.keys {
            let mixed = (mix64(right as u64 ^ *key) as u128) & self.half_mask;
            let next_right = left ^ mixed;
            left = right;
            right = next_right;
        }
        (left << self.half_bits) | right
    }
}

/// SplitMix64 finaliser.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
