//! Payload and trie codecs used during export.
//!
//! A [`DataCodec`] turns a mutable node payload into the fixed-width field
//! stored in the exported node header, writing any variable-length bytes to
//! the output first. A [`TrieCodec`] writes the trailer that anchors the root
//! and finds it again in a mapped region.

use std::io::{Seek, Write};
use std::marker::PhantomData;

use crate::encoding::{FixedField, Offset};
use crate::error::{Error, Result};
use crate::store::FileStore;

/// Encodes node payloads for export.
pub trait DataCodec<A: Offset> {
    /// Payload of the mutable node.
    type Data;

    /// Field written to the exported node header.
    type Stored: FixedField;

    fn encode<W: Write + Seek>(
        &self,
        data: &Self::Data,
        out: &mut FileStore<A, W>,
    ) -> Result<Self::Stored>;
}

/// Strings stored as NUL-terminated bytes, referenced by offset.
///
/// Empty strings are not written; their offset is zero. Read them back with
/// [`FlatStore::c_str`](crate::FlatStore::c_str). A string containing NUL
/// fails with [`Error::InteriorNul`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl<A: Offset> DataCodec<A> for StringCodec {
    type Data = String;
    type Stored = A;

    fn encode<W: Write + Seek>(&self, data: &String, out: &mut FileStore<A, W>) -> Result<A> {
        if data.is_empty() {
            return Ok(A::ZERO);
        }
        if let Some(i) = data.bytes().position(|b| b == 0) {
            return Err(Error::InteriorNul(i));
        }
        out.store(&[data.as_bytes(), &[0u8][..]])
    }
}

/// Fixed-width payloads stored directly in the node header.
pub struct InlineCodec<T>(PhantomData<fn() -> T>);

impl<T> InlineCodec<T> {
    pub fn new() -> Self {
        InlineCodec(PhantomData)
    }
}

impl<T> Default for InlineCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InlineCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for InlineCodec<T> {}

impl<A: Offset, T: FixedField> DataCodec<A> for InlineCodec<T> {
    type Data = T;
    type Stored = T;

    #[inline]
    fn encode<W: Write + Seek>(&self, data: &T, _out: &mut FileStore<A, W>) -> Result<T> {
        Ok(*data)
    }
}

/// Writes and locates the trie trailer.
pub trait TrieCodec<A: Offset> {
    /// Append the trailer for a trie whose root landed at `root`.
    fn encode_root<W: Write + Seek>(&self, root: A, out: &mut FileStore<A, W>) -> Result<()>;

    /// Recover the root offset from a complete exported region.
    fn find_root(&self, region: &[u8]) -> Result<A>;
}

/// Default trailer: the root offset in the last `size_of::<A>()` bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MmapTrieCodec;

impl<A: Offset> TrieCodec<A> for MmapTrieCodec {
    fn encode_root<W: Write + Seek>(&self, root: A, out: &mut FileStore<A, W>) -> Result<()> {
        let mut trailer = Vec::with_capacity(A::SIZE);
        root.write_le(&mut trailer);
        out.store(&[trailer.as_slice()])?;
        Ok(())
    }

    fn find_root(&self, region: &[u8]) -> Result<A> {
        let Some(at) = region.len().checked_sub(A::SIZE) else {
            return Err(Error::ShortFile {
                size: region.len() as u64,
                need: A::SIZE,
            });
        };
        Ok(A::read_le(&region[at..]))
    }
}
