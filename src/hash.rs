//! Interleaved bit-pattern hashes for quantized 2D coordinates.
//!
//! A [`SpatialHash`] encodes a pair of discrete axis values as a single
//! bit pattern by alternating bits from each axis, most significant level
//! first. Numeric ordering of the pattern traces a Z-order (Morton) curve
//! over the quantized plane, which is what lets a flat ordered index
//! range-scan spatially adjacent cells.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

/// Maximum per-axis resolution: 32 subdivision levels per axis, 64 bits total.
pub const MAX_RESOLUTION: u32 = 32;

/// The two axes of the quantized plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Even interleave positions.
    X,
    /// Odd interleave positions.
    Y,
}

/// An immutable, fixed-capacity interleaved hash of two axis values.
///
/// The pattern is stored left-aligned in a `u64`: bit 63 holds the x bit
/// of the coarsest level (level 0), bit 62 the y bit of the same level,
/// and so on downward. Bits below `2 * resolution` significant bits are
/// always zero, so for hashes of equal resolution the derived ordering is
/// exactly lexicographic order over the interleaved pattern. A hash with
/// fewer than [`MAX_RESOLUTION`] levels identifies a covering cell rather
/// than a single fully-resolved point.
///
/// # Examples
///
/// ```
/// use spatial_hash::{Axis, SpatialHash};
///
/// let hash = SpatialHash::from_bit_string("01")?;
/// assert_eq!(hash.resolution(), 1);
/// assert!(!hash.is_bit_set(0, Axis::X)?);
/// assert!(hash.is_bit_set(0, Axis::Y)?);
/// # Ok::<(), spatial_hash::HashError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpatialHash {
    // Field order matters: the derived ordering compares the pattern
    // before the resolution, so a proper prefix sorts before any longer
    // hash that extends it with a set bit.
    hash: u64,
    resolution: u32,
}

impl SpatialHash {
    /// Interleave two 32-bit axis values into a full-resolution hash.
    ///
    /// Bits of `x` land in even interleave positions, bits of `y` in odd
    /// ones, most significant bit first. Every input pair is valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatial_hash::SpatialHash;
    ///
    /// let hash = SpatialHash::from_coordinates(0, u32::MAX);
    /// assert_eq!(hash.to_string(), "01".repeat(32));
    /// ```
    pub fn from_coordinates(x: u32, y: u32) -> Self {
        Self {
            hash: (spread(x) << 1) | spread(y),
            resolution: MAX_RESOLUTION,
        }
    }

    /// Interleave two axis values and truncate to `resolution` levels.
    ///
    /// The axis values are taken at the full 32-bit scale; levels below
    /// `resolution` are dropped, yielding the hash of the covering cell at
    /// that resolution.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidHashLength`] when `resolution` exceeds
    /// [`MAX_RESOLUTION`].
    pub fn from_coordinates_at(x: u32, y: u32, resolution: u32) -> Result<Self> {
        if resolution > MAX_RESOLUTION {
            return Err(HashError::InvalidHashLength(2 * resolution as usize));
        }
        Ok(Self {
            hash: Self::from_coordinates(x, y).hash & pattern_mask(resolution),
            resolution,
        })
    }

    /// Parse a pre-interleaved bit string.
    ///
    /// The string length must be even (two bits per level) and at most 64.
    /// Matching the historical encoding this was ported from, the input is
    /// read byte by byte and any byte other than `'1'` contributes a zero
    /// bit.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidHashLength`] for odd or over-long input.
    pub fn from_bit_string(bits: &str) -> Result<Self> {
        let len = bits.len();
        if len % 2 != 0 || len > 2 * MAX_RESOLUTION as usize {
            return Err(HashError::InvalidHashLength(len));
        }
        let mut hash = 0u64;
        for (i, symbol) in bits.bytes().enumerate() {
            if symbol == b'1' {
                hash |= 1 << (63 - i);
            }
        }
        Ok(Self {
            hash,
            resolution: len as u32 / 2,
        })
    }

    /// The number of subdivision levels this hash stores per axis.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// The total number of significant bits, `2 * resolution`.
    pub fn bit_len(&self) -> u32 {
        2 * self.resolution
    }

    /// Whether the bit of `axis` at subdivision `level` is set.
    ///
    /// Level 0 is the coarsest subdivision. The x bit of a level sits at
    /// interleave position `2 * level`, the y bit just after it.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::IndexOutOfRange`] when `level` is not below
    /// this hash's stored resolution.
    pub fn is_bit_set(&self, level: u32, axis: Axis) -> Result<bool> {
        if level >= self.resolution {
            return Err(HashError::IndexOutOfRange {
                level,
                resolution: self.resolution,
            });
        }
        let position = 63 - 2 * level - matches!(axis, Axis::Y) as u32;
        Ok((self.hash >> position) & 1 == 1)
    }

    /// De-interleave into per-axis values.
    ///
    /// Each returned value is left-aligned within 32 bits: a hash of
    /// partial resolution recovers the lower-left corner of its cell at
    /// the full discrete scale, with zeros below its significant levels.
    /// For a full-resolution hash this inverts [`from_coordinates`]
    /// exactly.
    ///
    /// [`from_coordinates`]: SpatialHash::from_coordinates
    pub fn unhash(&self) -> (u32, u32) {
        (squash(self.hash >> 1), squash(self.hash))
    }

    /// The prefix of this hash at a coarser (or equal) resolution.
    ///
    /// The result identifies the ancestor covering cell that contains this
    /// hash's cell.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::IndexOutOfRange`] when `resolution` exceeds
    /// this hash's stored resolution.
    pub fn truncated(&self, resolution: u32) -> Result<Self> {
        if resolution > self.resolution {
            return Err(HashError::IndexOutOfRange {
                level: resolution,
                resolution: self.resolution,
            });
        }
        Ok(Self {
            hash: self.hash & pattern_mask(resolution),
            resolution,
        })
    }
}

impl fmt::Display for SpatialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.bit_len() {
            let bit = (self.hash >> (63 - i)) & 1;
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SpatialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpatialHash(\"{}\")", self)
    }
}

impl FromStr for SpatialHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bit_string(s)
    }
}

/// Mask keeping the top `2 * resolution` bits of a left-aligned pattern.
fn pattern_mask(resolution: u32) -> u64 {
    if resolution == 0 {
        0
    } else {
        !0u64 << (64 - 2 * resolution)
    }
}

/// Spread the bits of `value` so bit `i` lands at position `2 * i`.
fn spread(value: u32) -> u64 {
    let mut v = value as u64;
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    v = (v | (v << 1)) & 0x5555_5555_5555_5555;
    v
}

/// Inverse of [`spread`]: collect the bits at even positions.
fn squash(value: u64) -> u32 {
    let mut v = value & 0x5555_5555_5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333_3333_3333;
    v = (v | (v >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v >> 4)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v >> 8)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v >> 16)) & 0x0000_0000_FFFF_FFFF;
    v as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_bit_string(length: usize) -> String {
        // Fixed seed so failures reproduce.
        let mut rng = StdRng::seed_from_u64(31337);
        (0..length)
            .map(|_| if rng.gen_bool(0.5) { '1' } else { '0' })
            .collect()
    }

    #[test]
    fn test_zero_hash() {
        let hash = SpatialHash::from_coordinates(0, 0);
        assert_eq!(hash.resolution(), 32);
        assert_eq!(hash.unhash(), (0, 0));
    }

    #[test]
    fn test_random_valid_bit_strings() {
        for length in (0..=64).step_by(2) {
            let bits = random_bit_string(length);
            let hash = SpatialHash::from_bit_string(&bits).unwrap();
            assert_eq!(hash.bit_len() as usize, length);
            assert_eq!(hash.to_string(), bits);
        }
    }

    #[test]
    fn test_too_long_bit_string() {
        let bits = random_bit_string(100);
        assert_eq!(
            SpatialHash::from_bit_string(&bits),
            Err(HashError::InvalidHashLength(100))
        );
    }

    #[test]
    fn test_odd_bit_string() {
        let bits = random_bit_string(13);
        assert_eq!(
            SpatialHash::from_bit_string(&bits),
            Err(HashError::InvalidHashLength(13))
        );
    }

    #[test]
    fn test_bit_recovery() {
        let pairs = [
            (0u32, 0u32),
            (u32::MAX, 0),
            (0, u32::MAX),
            (u32::MAX, u32::MAX),
            (0x1234_5678, 0xDEAD_BEEF),
            (1, 1 << 31),
        ];
        for &(x, y) in &pairs {
            let hash = SpatialHash::from_coordinates(x, y);
            for level in 0..32 {
                let x_bit = (x >> (31 - level)) & 1 == 1;
                let y_bit = (y >> (31 - level)) & 1 == 1;
                assert_eq!(hash.is_bit_set(level, Axis::X).unwrap(), x_bit);
                assert_eq!(hash.is_bit_set(level, Axis::Y).unwrap(), y_bit);
            }
            assert_eq!(hash.unhash(), (x, y));
        }
    }

    #[test]
    fn test_bit_access_out_of_range() {
        let hash = SpatialHash::from_bit_string("0110").unwrap();
        assert!(hash.is_bit_set(1, Axis::Y).is_ok());
        assert_eq!(
            hash.is_bit_set(2, Axis::X),
            Err(HashError::IndexOutOfRange {
                level: 2,
                resolution: 2
            })
        );
    }

    #[test]
    fn test_non_binary_symbols_parse_byte_wise() {
        // Length and bit positions count bytes, so a two-byte symbol
        // occupies two zero bits and does not shift the '1' after it.
        let hash = SpatialHash::from_bit_string("1\u{e9}1").unwrap();
        assert_eq!(hash.resolution(), 2);
        assert_eq!(hash.to_string(), "1001");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let patterns = ["00", "0011", "01", "0110", "10", "1011", "11"];
        let hashes: Vec<SpatialHash> = patterns
            .iter()
            .map(|p| SpatialHash::from_bit_string(p).unwrap())
            .collect();
        for window in hashes.windows(2) {
            assert!(window[0] < window[1], "{:?} !< {:?}", window[0], window[1]);
        }

        // A prefix sorts immediately before the hash that extends it with
        // zero bits.
        let prefix = SpatialHash::from_bit_string("01").unwrap();
        let extended = SpatialHash::from_bit_string("0100").unwrap();
        assert!(prefix < extended);
    }

    #[test]
    fn test_interleaving_matches_hand_computed() {
        // x = 0b10 and y = 0b01 at two levels: pattern is x0 y0 x1 y1.
        let hash = SpatialHash::from_coordinates_at(0b10 << 30, 0b01 << 30, 2).unwrap();
        assert_eq!(hash.to_string(), "1001");
    }

    #[test]
    fn test_display_from_str_round_trip() {
        for length in (0..=64).step_by(8) {
            let bits = random_bit_string(length);
            let hash: SpatialHash = bits.parse().unwrap();
            let reparsed: SpatialHash = hash.to_string().parse().unwrap();
            assert_eq!(hash, reparsed);
        }
    }

    #[test]
    fn test_truncated_keeps_prefix() {
        let hash = SpatialHash::from_bit_string("11011000").unwrap();
        let parent = hash.truncated(2).unwrap();
        assert_eq!(parent.to_string(), "1101");
        assert_eq!(hash.truncated(0).unwrap().bit_len(), 0);
        assert!(hash.truncated(5).is_err());
    }

    #[test]
    fn test_from_coordinates_at_truncates() {
        let full = SpatialHash::from_coordinates(0xFFFF_FFFF, 0);
        let partial = SpatialHash::from_coordinates_at(0xFFFF_FFFF, 0, 4).unwrap();
        assert_eq!(partial, full.truncated(4).unwrap());
        assert!(SpatialHash::from_coordinates_at(0, 0, 33).is_err());
    }
}
