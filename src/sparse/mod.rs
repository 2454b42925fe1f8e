//! Sparse child collections.
//!
//! Both collections map the symbols of an [`Alphabet`] to child references,
//! storing only the present symbols: a presence mask plus a dense array
//! ordered by slot. Looking up a symbol is a mask test followed by a rank.
//!
//! - [`SVector`]: mutable, used by in-memory nodes during construction
//! - [`SArray`]: read-only view over the encoded `|mask|entries|` bytes of an
//!   exported node; [`SArray::encode`] produces that layout

use std::fmt;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::alphabet::{Alphabet, SymbolMask};
use crate::encoding::Offset;
use crate::error::{Error, Result};

/// Result of locating a symbol in a sparse collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// Alphabet slot of the symbol.
    pub slot: usize,
    /// Dense index the element has (or would have after insertion).
    pub index: usize,
    /// Whether the symbol is present.
    pub present: bool,
}

#[inline]
fn locate<X: Alphabet>(mask: &X::Mask, symbol: u8) -> Result<Pos> {
    let slot = X::slot(symbol)?;
    Ok(Pos {
        slot,
        index: X::rank(mask, slot),
        present: mask.contains(slot),
    })
}

// =============================================================================
// SVector
// =============================================================================

/// Mutable sparse collection.
pub struct SVector<P, X: Alphabet> {
    mask: X::Mask,
    items: SmallVec<[P; 2]>,
    _alphabet: PhantomData<X>,
}

impl<P, X: Alphabet> Default for SVector<P, X> {
    fn default() -> Self {
        Self {
            mask: Default::default(),
            items: SmallVec::new(),
            _alphabet: PhantomData,
        }
    }
}

impl<P: fmt::Debug, X: Alphabet> fmt::Debug for SVector<P, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(s, p)| (s as char, p))).finish()
    }
}

impl<P, X: Alphabet> SVector<P, X> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mask(&self) -> &X::Mask {
        &self.mask
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Locate `symbol`.
    #[inline]
    pub fn find(&self, symbol: u8) -> Result<Pos> {
        locate::<X>(&self.mask, symbol)
    }

    /// Element stored for `symbol`, if any.
    pub fn get(&self, symbol: u8) -> Result<Option<&P>> {
        let pos = self.find(symbol)?;
        Ok(pos.present.then(|| &self.items[pos.index]))
    }

    /// Element at a position returned by [`find`](Self::find) with `present` set.
    #[inline]
    pub fn at(&self, pos: &Pos) -> &P {
        debug_assert!(pos.present);
        &self.items[pos.index]
    }

    /// Insert `value` at a position returned by [`find`](Self::find) for an
    /// absent symbol, keeping elements ordered by slot.
    pub fn insert(&mut self, pos: Pos, value: P) {
        debug_assert!(!pos.present, "slot {} already present", pos.slot);
        self.items.insert(pos.index, value);
        self.mask.insert(pos.slot);
    }

    /// Element at dense `index`, in slot order.
    #[inline]
    pub fn value(&self, index: usize) -> Option<&P> {
        self.items.get(index)
    }

    /// Iterate `(symbol, element)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &P)> + '_ {
        self.mask.slots().map(X::symbol).zip(self.items.iter())
    }

    /// Iterate elements in slot order.
    pub fn values(&self) -> impl Iterator<Item = &P> + '_ {
        self.items.iter()
    }
}

// =============================================================================
// SArray
// =============================================================================

/// Read-only sparse collection decoded in place from `|mask|entries|`.
pub struct SArray<'a, A, X: Alphabet> {
    mask: X::Mask,
    entries: &'a [u8],
    _marker: PhantomData<(A, X)>,
}

impl<'a, A, X: Alphabet> Clone for SArray<'a, A, X> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A, X: Alphabet> Copy for SArray<'a, A, X> {}

impl<'a, A: Offset, X: Alphabet> SArray<'a, A, X> {
    /// Size of the encoded mask.
    pub const HEADER: usize = <X::Mask as SymbolMask>::BYTES;

    /// Encoded size of a collection with `n` children.
    #[inline]
    pub fn encoded_len(n: usize) -> usize {
        Self::HEADER + n * A::SIZE
    }

    /// Decode a collection from `buf`, which must start at the mask.
    ///
    /// Returns the collection and the number of bytes it spans.
    pub fn decode(buf: &'a [u8]) -> Result<(Self, usize)> {
        if buf.len() < Self::HEADER {
            return Err(Error::bad_offset(0, buf.len() as u64, Self::HEADER));
        }
        let mask = <X::Mask as SymbolMask>::read_le(buf);
        X::validate(&mask)?;
        let len = Self::encoded_len(mask.count());
        if buf.len() < len {
            return Err(Error::bad_offset(0, buf.len() as u64, len));
        }
        let entries = &buf[Self::HEADER..len];
        Ok((
            Self {
                mask,
                entries,
                _marker: PhantomData,
            },
            len,
        ))
    }

    #[inline]
    pub fn mask(&self) -> &X::Mask {
        &self.mask
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len() / A::SIZE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn find(&self, symbol: u8) -> Result<Pos> {
        locate::<X>(&self.mask, symbol)
    }

    #[inline]
    pub fn at(&self, pos: &Pos) -> A {
        A::read_le(&self.entries[pos.index * A::SIZE..])
    }

    /// Child offset stored for `symbol`, if any.
    pub fn get(&self, symbol: u8) -> Result<Option<A>> {
        let pos = self.find(symbol)?;
        Ok(pos.present.then(|| self.at(&pos)))
    }

    /// Iterate `(symbol, offset)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, A)> + 'a {
        let entries = self.entries;
        self.mask
            .slots()
            .enumerate()
            .map(move |(i, slot)| (X::symbol(slot), A::read_le(&entries[i * A::SIZE..])))
    }

    /// Encode `(symbol, offset)` pairs, given in slot order, as `|mask|entries|`.
    pub fn encode<I>(children: I, out: &mut Vec<u8>) -> Result<()>
    where
        I: IntoIterator<Item = (u8, A)>,
    {
        let mut mask = <X::Mask>::default();
        let mut entries: SmallVec<[A; 16]> = SmallVec::new();
        for (symbol, addr) in children {
            if entries.len() == X::CAPACITY {
                return Err(Error::TooManyChildren {
                    count: entries.len() + 1,
                    capacity: X::CAPACITY,
                });
            }
            mask.insert(X::slot(symbol)?);
            entries.push(addr);
        }
        mask.write_le(out);
        for addr in entries {
            addr.write_le(out);
        }
        Ok(())
    }
}
