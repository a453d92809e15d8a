//! Geohash encoding over the standard 32-symbol alphabet.
//!
//! Bits alternate between longitude and latitude, starting with longitude,
//! and every 5 bits form one symbol (most significant bit first).

use std::fmt;
use crate::models::{BoundingBox, Coordinate};

/// Symbols used for each 5-bit group
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Cell length used for indexing providers and requests
pub const DEFAULT_PRECISION: usize = 6;

/// An encoded cell. Only produced by [`encode`] and [`neighbors`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Geohash(String);

impl Geohash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first `chars` symbols, or the whole hash if it is shorter
    pub fn prefix(&self, chars: usize) -> &str {
        // Alphabet is ASCII so byte and char offsets coincide
        &self.0[..chars.min(self.0.len())]
    }
}

impl fmt::Display for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[inline]
fn symbol_index(c: char) -> Option<usize> {
    BASE32.iter().position(|&b| b as char == c)
}

/// Encode a coordinate to exactly `precision` symbols
///
/// Out-of-range coordinates are not rejected; they saturate to the edge cell.
pub fn encode(coord: &Coordinate, precision: usize) -> Geohash {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);
    let mut bit = 0usize;
    let mut ch = 0usize;

    while hash.len() < precision {
        let (range, value) = if bit % 2 == 0 {
            (&mut lon_range, coord.longitude)
        } else {
            (&mut lat_range, coord.latitude)
        };

        let mid = (range.0 + range.1) / 2.0;
        if value >= mid {
            ch |= 1 << (4 - bit % 5);
            range.0 = mid;
        } else {
            range.1 = mid;
        }

        bit += 1;
        if bit % 5 == 0 {
            hash.push(BASE32[ch] as char);
            ch = 0;
        }
    }

    Geohash(hash)
}

/// Rectangle covered by a hash
///
/// Symbols outside the alphabet leave the ranges untouched but still consume
/// their five bit positions, so later symbols keep their axis.
pub fn decode_bounds(hash: &str) -> BoundingBox {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut is_lon = true;

    for c in hash.chars() {
        let index = symbol_index(c);
        for bit in 0..5 {
            let range = if is_lon { &mut lon_range } else { &mut lat_range };
            if let Some(index) = index {
                let mid = (range.0 + range.1) / 2.0;
                if index & (1 << (4 - bit)) != 0 {
                    range.0 = mid;
                } else {
                    range.1 = mid;
                }
            }
            is_lon = !is_lon;
        }
    }

    BoundingBox {
        min_lat: lat_range.0,
        max_lat: lat_range.1,
        min_lon: lon_range.0,
        max_lon: lon_range.1,
    }
}

/// Center of the cell named by `hash`
pub fn decode(hash: &str) -> Coordinate {
    decode_bounds(hash).center()
}

/// Cells searched around `hash` when matching
///
/// These are the 32 siblings sharing the parent prefix, not the 8 cells that
/// touch `hash` geographically. A hash of one symbol or less has no parent and
/// yields only itself.
pub fn neighbors(hash: &Geohash) -> Vec<Geohash> {
    if hash.len() <= 1 {
        return vec![hash.clone()];
    }

    let parent = &hash.0[..hash.0.len() - 1];
    BASE32
        .iter()
        .map(|&symbol| {
            let mut sibling = String::with_capacity(hash.len());
            sibling.push_str(parent);
            sibling.push(symbol as char);
            Geohash(sibling)
        })
        .collect()
}
