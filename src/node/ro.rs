//! Read-only nodes decoded in place from an exported region.

use std::fmt;
use std::marker::PhantomData;

use crate::alphabet::Alphabet;
use crate::encoding::{FixedField, Offset};
use crate::error::{Error, Result};
use crate::sparse::SArray;
use crate::store::check_span;

use super::{LinkedNode, TrieNode};

/// Layout of an exported node kind.
pub trait FlatNode: 'static {
    /// File offset type.
    type Addr: Offset;

    /// Fixed-width payload stored in the node header.
    type Data: FixedField;

    type Alphabet: Alphabet;

    /// Whether the header carries `|suffix|shift|`.
    const LINKED: bool;

    /// Size of the header preceding the children mask.
    const HEADER: usize = <Self::Data as FixedField>::SIZE
        + if Self::LINKED {
            <Self::Addr as FixedField>::SIZE + 1
        } else {
            0
        };
}

/// Exported [`PNode`](super::PNode): `|data|mask|children|`.
pub struct PNodeRo<A, D, X>(PhantomData<fn() -> (A, D, X)>);

/// Exported [`PNodeSs`](super::PNodeSs): `|data|suffix|shift|mask|children|`.
pub struct PNodeSsRo<A, D, X>(PhantomData<fn() -> (A, D, X)>);

impl<A: Offset, D: FixedField, X: Alphabet> FlatNode for PNodeRo<A, D, X> {
    type Addr = A;
    type Data = D;
    type Alphabet = X;
    const LINKED: bool = false;
}

impl<A: Offset, D: FixedField, X: Alphabet> FlatNode for PNodeSsRo<A, D, X> {
    type Addr = A;
    type Data = D;
    type Alphabet = X;
    const LINKED: bool = true;
}

impl<A, D, X> LinkedNode for PNodeSsRo<A, D, X> {}

/// A node decoded from a flat region.
///
/// Header fields are copied out; the children stay in the region. Nodes are
/// written children first, so a child offset at or past its parent's is
/// reported as `BadOffset` when the child is read.
pub struct FlatView<'a, N: FlatNode> {
    at: u64,
    size: u64,
    data: N::Data,
    suffix: N::Addr,
    shift: u8,
    children: SArray<'a, N::Addr, N::Alphabet>,
}

impl<'a, N: FlatNode> FlatView<'a, N> {
    /// Decode the node stored at `at`.
    ///
    /// Every field is bounds-checked against `region`.
    pub fn decode(region: &'a [u8], at: N::Addr) -> Result<Self> {
        let size = region.len();
        let mask_len = SArray::<N::Addr, N::Alphabet>::HEADER;
        let start = check_span(size, at.to_u64(), N::HEADER + mask_len)?;

        let data = <N::Data as FixedField>::read_le(&region[start..]);
        let mut pos = start + <N::Data as FixedField>::SIZE;
        let (suffix, shift) = if N::LINKED {
            let suffix = <N::Addr as FixedField>::read_le(&region[pos..]);
            let shift = region[pos + <N::Addr as FixedField>::SIZE];
            pos += <N::Addr as FixedField>::SIZE + 1;
            if !suffix.is_zero() && shift == 0 {
                return Err(Error::BadSuffix { shift });
            }
            (suffix, shift)
        } else {
            (<N::Addr as Offset>::ZERO, 0)
        };

        let (children, _) = SArray::decode(&region[pos..]).map_err(|e| match e {
            Error::BadOffset { need, .. } => Error::bad_offset(pos as u64, size as u64, need),
            e => e,
        })?;

        Ok(Self {
            at: at.to_u64(),
            size: size as u64,
            data,
            suffix,
            shift,
            children,
        })
    }

    #[inline]
    pub fn children(&self) -> &SArray<'a, N::Addr, N::Alphabet> {
        &self.children
    }

    #[inline]
    fn below(&self, child: N::Addr) -> Result<N::Addr> {
        if child.to_u64() < self.at {
            Ok(child)
        } else {
            let need = N::HEADER + SArray::<N::Addr, N::Alphabet>::HEADER;
            Err(Error::bad_offset(child.to_u64(), self.size, need))
        }
    }
}

impl<'a, N: FlatNode> fmt::Debug for FlatView<'a, N>
where
    N::Data: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatView")
            .field("data", &self.data)
            .field("suffix", &self.suffix)
            .field("shift", &self.shift)
            .field("children", &self.children.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, N: FlatNode> TrieNode for FlatView<'a, N> {
    type Ptr = N::Addr;
    type Data = N::Data;

    #[inline]
    fn data(&self) -> &N::Data {
        &self.data
    }

    #[inline]
    fn child(&self, symbol: u8) -> Result<Option<N::Addr>> {
        self.children.get(symbol)?.map(|c| self.below(c)).transpose()
    }

    fn for_each_child<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(u8, N::Addr) -> Result<()>,
    {
        self.children
            .iter()
            .try_for_each(|(s, c)| f(s, self.below(c)?))
    }

    #[inline]
    fn suffix(&self) -> Option<N::Addr> {
        (!self.suffix.is_zero()).then_some(self.suffix)
    }

    #[inline]
    fn shift(&self) -> u8 {
        self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Digits;

    type Plain = PNodeRo<u32, u64, Digits>;
    type Linked = PNodeSsRo<u64, u32, Digits>;

    #[test]
    fn test_header_sizes() {
        assert_eq!(Plain::HEADER, 8);
        assert_eq!(Linked::HEADER, 4 + 8 + 1);
    }

    #[test]
    fn test_decode_linked() {
        let mut region = vec![b'F'; 16];
        7u32.write_le(&mut region);
        99u64.write_le(&mut region);
        3u8.write_le(&mut region);
        SArray::<u64, Digits>::encode([(b'0', 1u64), (b'9', 2)], &mut region).unwrap();

        let view = FlatView::<Linked>::decode(&region, 16).unwrap();
        assert_eq!(*view.data(), 7);
        assert_eq!(view.suffix(), Some(99));
        assert_eq!(view.shift(), 3);
        let mut seen = Vec::new();
        view.for_each_child(|s, c| {
            seen.push((s, c));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![(b'0', 1), (b'9', 2)]);
    }

    #[test]
    fn test_truncated_children_report_region_offset() {
        let mut region = vec![b'F'];
        7u64.write_le(&mut region);
        SArray::<u32, Digits>::encode([(b'5', 1u32)], &mut region).unwrap();
        region.pop();

        match FlatView::<Plain>::decode(&region, 1) {
            Err(Error::BadOffset { offset, size, .. }) => {
                assert_eq!(offset, 9);
                assert_eq!(size, region.len() as u64);
            }
            other => panic!("unexpected: {:?}", other.map(|v| *v.data())),
        }
    }

    #[test]
    fn test_suffix_without_shift_is_rejected() {
        let mut region = vec![b'F'];
        7u32.write_le(&mut region);
        1u64.write_le(&mut region);
        0u8.write_le(&mut region);
        SArray::<u64, Digits>::encode(std::iter::empty(), &mut region).unwrap();

        assert!(matches!(
            FlatView::<Linked>::decode(&region, 1),
            Err(Error::BadSuffix { shift: 0 })
        ));
    }

    #[test]
    fn test_child_at_or_after_parent_is_rejected() {
        let mut region = vec![b'F'];
        7u64.write_le(&mut region);
        SArray::<u32, Digits>::encode([(b'1', 1u32), (b'2', 40)], &mut region).unwrap();
        let view = FlatView::<Plain>::decode(&region, 1).unwrap();

        assert!(matches!(
            view.child(b'1'),
            Err(Error::BadOffset { offset: 1, .. })
        ));
        assert!(matches!(
            view.child(b'2'),
            Err(Error::BadOffset { offset: 40, .. })
        ));
        assert_eq!(view.child(b'3').unwrap(), None);
        assert!(view.for_each_child(|_, _| Ok(())).is_err());
    }
}
