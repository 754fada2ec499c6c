// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Deterministic randomness. Nothing here reads an entropy source: every
//! value is a pure function of its seed, and the generator is threaded
//! through as a value.

use crate::types::timestamp::Timestamp;

pub type Seed = u64;

/// A minimal, completely insecure PRNG. Stepping consumes the generator and
/// hands back its successor, so there is no shared state to reseed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

/// 2^32, for mapping a `u32` onto [0, 1).
const U32_RANGE: f64 = 4_294_967_296.0;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: Seed) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(self) -> (u32, Self) {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        ((new >> 32) as u32, Self { state: new })
    }

    /// A float in [0, 1).
    pub fn next_f64(self) -> (f64, Self) {
        let (n, rng) = self.next_u32();
        (n as f64 / U32_RANGE, rng)
    }
}

/// The first value a generator seeded with `seed` produces.
pub fn unit_from_seed(seed: Seed) -> f64 {
    TinyRng::from_seed(seed).next_f64().0
}

/// Hash arbitrary bytes down to a seed (first eight bytes of BLAKE3).
pub fn seed_from_bytes(bytes: &[u8]) -> Seed {
    let hash = blake3::hash(bytes);
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(buf)
}

pub fn seed_from_str(s: &str) -> Seed {
    seed_from_bytes(s.as_bytes())
}

pub fn seed_from_timestamp(ts: Timestamp) -> Seed {
    seed_from_bytes(&ts.as_millis().to_le_bytes())
}

/// 32-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(0x01000193);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = TinyRng::from_seed(42);
        let b = TinyRng::from_seed(42);
        let (x1, a) = a.next_f64();
        let (y1, b) = b.next_f64();
        let (x2, _) = a.next_f64();
        let (y2, _) = b.next_f64();
        assert_eq!(x1, y1);
        assert_eq!(x2, y2);
        assert_ne!(x1, x2);
    }

    #[test]
    fn test_unit_range() {
        let mut rng = TinyRng::from_seed(7);
        for _ in 0..1000 {
            let (x, next) = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
            rng = next;
        }
    }

    #[test]
    fn test_unit_from_seed() {
        let (first, _) = TinyRng::from_seed(99).next_f64();
        assert_eq!(unit_from_seed(99), first);
    }

    #[test]
    fn test_seed_from_str() {
        assert_eq!(seed_from_str("a"), seed_from_str("a"));
        assert_ne!(seed_from_str("a"), seed_from_str("b"));
    }

    #[test]
    fn test_fnv1a() {
        assert_eq!(fnv1a(b""), 0x811c9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c292c);
    }
}
