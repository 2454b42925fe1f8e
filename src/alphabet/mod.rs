//! Symbol alphabets for trie keys.
//!
//! An alphabet maps a key byte to a slot in `0..CAPACITY` and defines the
//! presence mask used by the sparse child collections. Children are stored
//! densely in slot order, so the position of a child is the number of present
//! slots below it (its rank in the mask).

use std::fmt;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Presence bitmask over the slots of an alphabet.
pub trait SymbolMask: Copy + Eq + Default + fmt::Debug {
    /// Encoded size in bytes.
    const BYTES: usize;

    fn contains(&self, slot: usize) -> bool;

    fn insert(&mut self, slot: usize);

    /// Number of present slots.
    fn count(&self) -> usize;

    /// First present slot at or after `from`.
    fn next_slot(&self, from: usize) -> Option<usize>;

    fn write_le(&self, out: &mut Vec<u8>);

    /// Decode from the first `BYTES` bytes of `buf`.
    fn read_le(buf: &[u8]) -> Self;

    /// Iterate present slots in increasing order.
    fn slots(&self) -> Slots<Self> {
        Slots {
            mask: *self,
            next: 0,
        }
    }
}

/// Iterator over the present slots of a mask.
pub struct Slots<M> {
    mask: M,
    next: usize,
}

impl<M: SymbolMask> Iterator for Slots<M> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let slot = self.mask.next_slot(self.next)?;
        self.next = slot + 1;
        Some(slot)
    }
}

/// A key alphabet.
pub trait Alphabet: 'static {
    /// Presence mask type.
    type Mask: SymbolMask;

    /// Number of distinct symbols.
    const CAPACITY: usize;

    /// Map a key byte to its slot.
    fn slot(symbol: u8) -> Result<usize>;

    /// Map a slot back to its key byte.
    fn symbol(slot: usize) -> u8;

    /// Dense index of `slot` within a collection whose presence mask is `mask`.
    fn rank(mask: &Self::Mask, slot: usize) -> usize;

    /// Check that a decoded mask only uses valid slots.
    fn validate(mask: &Self::Mask) -> Result<()>;
}

// =============================================================================
// Digits
// =============================================================================

/// Decimal digit alphabet: keys are ASCII `'0'..='9'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Digits;

const DIGIT_MASKS: usize = 1 << 10;

impl SymbolMask for u16 {
    const BYTES: usize = 2;

    #[inline]
    fn contains(&self, slot: usize) -> bool {
        slot < 16 && (*self & (1u16 << slot)) != 0
    }

    #[inline]
    fn insert(&mut self, slot: usize) {
        *self |= 1u16 << slot;
    }

    #[inline]
    fn count(&self) -> usize {
        self.count_ones() as usize
    }

    #[inline]
    fn next_slot(&self, from: usize) -> Option<usize> {
        if from >= 16 {
            return None;
        }
        let rest = *self >> from;
        (rest != 0).then(|| from + rest.trailing_zeros() as usize)
    }

    fn write_le(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(buf: &[u8]) -> Self {
        u16::from_le_bytes([buf[0], buf[1]])
    }
}

/// Precomputed `(mask, slot) -> dense index` table for the digit alphabet.
///
/// Built once per process and shared read-only by every digit collection.
pub struct IndexTable {
    maps: Box<[u8]>,
}

impl IndexTable {
    fn build() -> Self {
        let mut maps = vec![0u8; DIGIT_MASKS * 10].into_boxed_slice();
        for slot in 0..10usize {
            let below = (1usize << slot) - 1;
            for mask in 0..DIGIT_MASKS {
                maps[mask | (slot << 10)] = (mask & below).count_ones() as u8;
            }
        }
        Self { maps }
    }

    /// The process-wide table.
    pub fn shared() -> &'static IndexTable {
        static TABLE: OnceLock<IndexTable> = OnceLock::new();
        TABLE.get_or_init(IndexTable::build)
    }

    /// Dense index of `slot` for a valid 10-bit `mask`.
    #[inline]
    pub fn index(&self, mask: u16, slot: usize) -> usize {
        debug_assert!((mask as usize) < DIGIT_MASKS && slot < 10);
        self.maps[mask as usize | (slot << 10)] as usize
    }
}

impl Alphabet for Digits {
    type Mask = u16;
    const CAPACITY: usize = 10;

    #[inline]
    fn slot(symbol: u8) -> Result<usize> {
        match symbol {
            b'0'..=b'9' => Ok((symbol - b'0') as usize),
            _ => Err(Error::BadSymbol(symbol)),
        }
    }

    #[inline]
    fn symbol(slot: usize) -> u8 {
        b'0' + slot as u8
    }

    #[inline]
    fn rank(mask: &u16, slot: usize) -> usize {
        IndexTable::shared().index(*mask, slot)
    }

    fn validate(mask: &u16) -> Result<()> {
        if (*mask as usize) < DIGIT_MASKS {
            Ok(())
        } else {
            Err(Error::BadMask)
        }
    }
}

// =============================================================================
// Bytes
// =============================================================================

/// Full byte alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bytes;

/// 256-bit presence mask, one bit per byte value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteMask([u64; 4]);

impl SymbolMask for ByteMask {
    const BYTES: usize = 32;

    #[inline]
    fn contains(&self, slot: usize) -> bool {
        slot < 256 && (self.0[slot >> 6] >> (slot & 63)) & 1 != 0
    }

    #[inline]
    fn insert(&mut self, slot: usize) {
        self.0[slot >> 6] |= 1u64 << (slot & 63);
    }

    #[inline]
    fn count(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn next_slot(&self, from: usize) -> Option<usize> {
        let mut word = from >> 6;
        if word >= 4 {
            return None;
        }
        let mut bits = self.0[word] & (!0u64 << (from & 63));
        loop {
            if bits != 0 {
                return Some((word << 6) + bits.trailing_zeros() as usize);
            }
            word += 1;
            if word == 4 {
                return None;
            }
            bits = self.0[word];
        }
    }

    fn write_le(&self, out: &mut Vec<u8>) {
        for w in &self.0 {
            out.extend_from_slice(&w.to_le_bytes());
        }
    }

    fn read_le(buf: &[u8]) -> Self {
        let mut words = [0u64; 4];
        for (i, w) in words.iter_mut().enumerate() {
            let mut b = [0u8; 8];
            b.copy_from_slice(&buf[i * 8..i * 8 + 8]);
            *w = u64::from_le_bytes(b);
        }
        ByteMask(words)
    }
}

impl Alphabet for Bytes {
    type Mask = ByteMask;
    const CAPACITY: usize = 256;

    #[inline]
    fn slot(symbol: u8) -> Result<usize> {
        Ok(symbol as usize)
    }

    #[inline]
    fn symbol(slot: usize) -> u8 {
        slot as u8
    }

    #[inline]
    fn rank(mask: &ByteMask, slot: usize) -> usize {
        let word = slot >> 6;
        let below: usize = mask.0[..word].iter().map(|w| w.count_ones() as usize).sum();
        let partial = mask.0[word] & ((1u64 << (slot & 63)) - 1);
        below + partial.count_ones() as usize
    }

    fn validate(_mask: &ByteMask) -> Result<()> {
        Ok(())
    }
}
