//! Read-only store over an exported byte region.

use std::marker::PhantomData;
use std::ops::Deref;

use crate::encoding::{FixedField, Offset};
use crate::error::{Error, Result};
use crate::node::{FlatNode, FlatView, LinkedNode};

use super::{LinkedStore, NodeStore};

/// Check that `need` bytes fit at `offset` in a region of `size` bytes and
/// return the offset as an index.
///
/// Fails for `offset > size - need`; the exact boundary is accepted.
#[inline]
pub(crate) fn check_span(size: usize, offset: u64, need: usize) -> Result<usize> {
    let fits = size
        .checked_sub(need)
        .map_or(false, |last| offset <= last as u64);
    if fits {
        Ok(offset as usize)
    } else {
        Err(Error::bad_offset(offset, size as u64, need))
    }
}

/// Flat store: nodes are addressed by their byte offset in `region`.
///
/// `B` is anything that derefs to bytes: a memory map, a `Vec<u8>` or a
/// borrowed slice. The store never allocates.
pub struct FlatStore<B, N> {
    region: B,
    _node: PhantomData<fn() -> N>,
}

impl<B: Deref<Target = [u8]>, N> FlatStore<B, N> {
    pub fn new(region: B) -> Self {
        Self {
            region,
            _node: PhantomData,
        }
    }

    /// The backing bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.region
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.region.len() as u64
    }

    /// Read a `T` stored at `offset`.
    ///
    /// Fails with [`Error::BadOffset`] when `offset > size - T::SIZE`.
    pub fn native_pointer<T: FixedField>(&self, offset: u64) -> Result<T> {
        let at = check_span(self.region.len(), offset, T::SIZE)?;
        Ok(T::read_le(&self.region[at..]))
    }

    /// NUL-terminated bytes written by [`StringCodec`](crate::StringCodec).
    ///
    /// Offset zero is the empty string.
    pub fn c_str<A: Offset>(&self, offset: A) -> Result<&[u8]> {
        if offset.is_zero() {
            return Ok(&[]);
        }
        let at = check_span(self.region.len(), offset.to_u64(), 1)?;
        let tail = &self.region[at..];
        let len = tail.iter().position(|&b| b == 0).ok_or_else(|| {
            Error::bad_offset(offset.to_u64(), self.size(), tail.len() + 1)
        })?;
        Ok(&tail[..len])
    }
}

impl<B: Deref<Target = [u8]>, N: FlatNode> NodeStore for FlatStore<B, N> {
    type Ptr = N::Addr;
    type Data = N::Data;
    type Node<'a> = FlatView<'a, N> where Self: 'a;

    const NULL: N::Addr = <N::Addr as Offset>::ZERO;
    const DYNAMIC: bool = false;

    fn node(&self, ptr: N::Addr) -> Result<FlatView<'_, N>> {
        if ptr.is_zero() {
            return Err(Error::NullPointer);
        }
        FlatView::decode(&self.region, ptr)
    }
}

impl<B: Deref<Target = [u8]>, N: FlatNode + LinkedNode> LinkedStore for FlatStore<B, N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Digits;
    use crate::node::PNodeRo;

    type Store = FlatStore<Vec<u8>, PNodeRo<u32, u32, Digits>>;

    #[test]
    fn test_native_pointer_boundary() {
        let store = Store::new((0u8..16).collect());
        // Exactly at size - sizeof(T)
        assert_eq!(store.native_pointer::<u32>(12).unwrap(), 0x0f0e_0d0c);
        assert!(matches!(
            store.native_pointer::<u32>(13),
            Err(Error::BadOffset {
                offset: 13,
                size: 16,
                need: 4
            })
        ));
        assert!(store.native_pointer::<u64>(u64::MAX).is_err());
    }

    #[test]
    fn test_native_pointer_on_tiny_region() {
        let store = Store::new(vec![1, 2]);
        assert!(store.native_pointer::<u32>(0).is_err());
        assert_eq!(store.native_pointer::<u16>(0).unwrap(), 0x0201);
    }

    #[test]
    fn test_c_str() {
        let store = Store::new(b"Fabc\0de".to_vec());
        assert_eq!(store.c_str(1u32).unwrap(), b"abc");
        assert_eq!(store.c_str(0u32).unwrap(), b"");
        // Missing terminator
        assert!(store.c_str(5u32).is_err());
        assert!(store.c_str(7u32).is_err());
    }

    #[test]
    fn test_null_node() {
        let store = Store::new(vec![0; 32]);
        assert!(matches!(store.node(0), Err(Error::NullPointer)));
        assert!(matches!(store.node(31), Err(Error::BadOffset { .. })));
    }
}
