//! Default hash function for [`HashTable`](crate::HashTable).
//!
//! Integral keys hash to their own value and derived enums hash through
//! their discriminant, which is integral too. Byte strings are folded with a
//! positional XOR/shift: byte `i` is XORed in after shifting left by
//! `i mod 64`. The function is deterministic and not DoS resistant; plug in
//! `std::collections::hash_map::RandomState` when keys are untrusted.

use core::hash::{BuildHasher, Hasher};

/// Width of the state in bits; shifts wrap around at this value.
const STATE_BITS: u64 = u64::BITS as u64;

/// Positional XOR/shift hasher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionalHasher {
    hash: u64,
    // Bytes consumed so far, across all writes.
    position: u64,
}

impl PositionalHasher {
    pub const fn new() -> Self {
        Self {
            hash: 0,
            position: 0,
        }
    }

    /// The first integral write becomes the hash; later ones are folded in.
    #[inline]
    fn write_integral(&mut self, value: u64, width: u64) {
        self.hash = if self.position == 0 {
            value
        } else {
            self.hash.rotate_left((self.position % STATE_BITS) as u32) ^ value
        };
        self.position += width;
    }
}

impl Hasher for PositionalHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash ^= u64::from(b) << (self.position % STATE_BITS);
            self.position += 1;
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.write_integral(u64::from(i), 1);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.write_integral(u64::from(i), 2);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.write_integral(u64::from(i), 4);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.write_integral(i, 8);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_integral(i as u64, core::mem::size_of::<usize>() as u64);
    }
}

/// Zero-sized [`BuildHasher`] for [`PositionalHasher`]; the default hasher
/// state of every table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionalState;

impl BuildHasher for PositionalState {
    type Hasher = PositionalHasher;

    #[inline]
    fn build_hasher(&self) -> PositionalHasher {
        PositionalHasher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::Hash;

    fn hash_of<T: Hash + ?Sized>(v: &T) -> u64 {
        PositionalState.hash_one(v)
    }

    #[test]
    fn integers_hash_to_their_value() {
        assert_eq!(hash_of(&0u8), 0);
        assert_eq!(hash_of(&42u32), 42);
        assert_eq!(hash_of(&1_000_000usize), 1_000_000);
        assert_eq!(hash_of(&7i64), 7);
        // Signed values go through their two's complement bit pattern.
        assert_eq!(hash_of(&-1i32), u64::from(u32::MAX));
    }

    #[test]
    fn derived_enums_hash_through_discriminant() {
        #[derive(Hash)]
        enum Color {
            Red,
            Green,
            Blue,
        }
        let hashes = [hash_of(&Color::Red), hash_of(&Color::Green), hash_of(&Color::Blue)];
        assert_eq!(hashes, [0, 1, 2]);
    }

    #[test]
    fn bytes_fold_by_position() {
        let mut h = PositionalHasher::new();
        h.write(b"ab");
        assert_eq!(h.finish(), u64::from(b'a') ^ (u64::from(b'b') << 1));

        // Order matters.
        assert_ne!(hash_of("ab"), hash_of("ba"));
        assert_eq!(hash_of("key"), hash_of(&String::from("key")));
    }

    #[test]
    fn shift_wraps_past_state_width() {
        let long = vec![1u8; 65];
        let mut h = PositionalHasher::new();
        h.write(&long);
        // Bytes 0..64 set one bit each; byte 64 toggles bit 0 back off.
        assert_eq!(h.finish(), u64::MAX & !1);
    }
}
