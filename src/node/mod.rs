//! Trie nodes.
//!
//! Every node kind exposes the read contract [`TrieNode`]. Mutable nodes
//! ([`PNode`], [`PNodeSs`]) add [`MutNode`], which covers construction and
//! serialization. Read-only nodes ([`PNodeRo`], [`PNodeSsRo`]) describe the
//! exported layout and are decoded in place as [`FlatView`]s.
//!
//! Exported layout, little-endian with no padding:
//!
//! ```text
//! |data|children mask|child offsets...|              PNodeRo
//! |data|suffix offset|shift|children mask|child offsets...|  PNodeSsRo
//! ```

use std::io::{Seek, Write};

use smallvec::SmallVec;
use tracing::trace;

use crate::alphabet::Alphabet;
use crate::codec::DataCodec;
use crate::encoding::{FixedField, Offset};
use crate::error::Result;
use crate::sparse::{SArray, SVector};
use crate::store::{FileStore, NodeId};

mod pnode;
mod ro;

pub use pnode::{PNode, PNodeSs};
pub use ro::{FlatNode, FlatView, PNodeRo, PNodeSsRo};

/// Read access shared by all node kinds.
pub trait TrieNode {
    /// Store pointer type of child and suffix references.
    type Ptr: Copy + Eq;

    /// Node payload.
    type Data;

    fn data(&self) -> &Self::Data;

    /// Child reached by `symbol`, if any.
    ///
    /// Fails with [`Error::BadSymbol`](crate::Error::BadSymbol) for symbols
    /// outside of the node alphabet.
    fn child(&self, symbol: u8) -> Result<Option<Self::Ptr>>;

    /// Visit `(symbol, child)` pairs in symbol order.
    fn for_each_child<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(u8, Self::Ptr) -> Result<()>;

    /// Suffix link, for suffix-linked nodes.
    fn suffix(&self) -> Option<Self::Ptr> {
        None
    }

    /// Number of leading symbols dropped when following the suffix link.
    fn shift(&self) -> u8 {
        0
    }
}

impl<T: TrieNode + ?Sized> TrieNode for &T {
    type Ptr = T::Ptr;
    type Data = T::Data;

    #[inline]
    fn data(&self) -> &T::Data {
        (**self).data()
    }

    #[inline]
    fn child(&self, symbol: u8) -> Result<Option<T::Ptr>> {
        (**self).child(symbol)
    }

    #[inline]
    fn for_each_child<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(u8, T::Ptr) -> Result<()>,
    {
        (**self).for_each_child(f)
    }

    #[inline]
    fn suffix(&self) -> Option<T::Ptr> {
        (**self).suffix()
    }

    #[inline]
    fn shift(&self) -> u8 {
        (**self).shift()
    }
}

/// Marker for node kinds that carry suffix links.
pub trait LinkedNode {}

/// Where a node landed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Written<A> {
    /// Address of the node blob.
    pub addr: A,
    /// Position of the suffix field inside the blob, for linked nodes.
    pub link_at: Option<usize>,
}

/// Mutable node stored in a [`SimpleStore`](crate::SimpleStore).
pub trait MutNode: TrieNode<Ptr = NodeId> + Default {
    type Alphabet: Alphabet;

    /// Whether the exported layout has a suffix field.
    const LINKED: bool;

    fn data_mut(&mut self) -> &mut Self::Data;

    fn children(&self) -> &SVector<NodeId, Self::Alphabet>;

    fn children_mut(&mut self) -> &mut SVector<NodeId, Self::Alphabet>;

    /// Set the suffix link. Ignored by nodes without one.
    fn set_suffix(&mut self, _suffix: Option<NodeId>, _shift: u8) {}

    /// Serialize the node: payload bytes first, then every child subtree
    /// through `resolve`, then the node blob itself.
    ///
    /// `resolve` maps a child to its output address, writing the child first
    /// if needed. The suffix field is written as null and patched later by
    /// [`store_links`](Self::store_links).
    fn write_to_store<A, C, W, R>(
        &self,
        codec: &C,
        mut resolve: R,
        out: &mut FileStore<A, W>,
    ) -> Result<Written<A>>
    where
        A: Offset,
        C: DataCodec<A, Data = Self::Data>,
        W: Write + Seek,
        R: FnMut(NodeId, &mut FileStore<A, W>) -> Result<A>,
    {
        let data = codec.encode(self.data(), out)?;

        let mut children: SmallVec<[(u8, A); 16]> = SmallVec::new();
        for (symbol, &child) in self.children().iter() {
            children.push((symbol, resolve(child, out)?));
        }

        let mut buf = Vec::with_capacity(
            <C::Stored as FixedField>::SIZE
                + A::SIZE
                + 1
                + SArray::<A, Self::Alphabet>::encoded_len(children.len()),
        );
        data.write_le(&mut buf);
        let link_at = if Self::LINKED {
            let at = buf.len();
            A::ZERO.write_le(&mut buf);
            self.shift().write_le(&mut buf);
            Some(at)
        } else {
            None
        };
        SArray::<A, Self::Alphabet>::encode(children, &mut buf)?;

        let addr = out.store(&[buf.as_slice()])?;
        Ok(Written { addr, link_at })
    }

    /// Patch the suffix field of an already written node.
    fn store_links<A, W>(
        &self,
        written: &Written<A>,
        suffix: A,
        out: &mut FileStore<A, W>,
    ) -> Result<()>
    where
        A: Offset,
        W: Write + Seek,
    {
        let Some(at) = written.link_at else {
            return Ok(());
        };
        if suffix.is_zero() {
            return Ok(());
        }
        trace!(node = %written.addr, %suffix, shift = self.shift(), "patching suffix link");
        let mut field = Vec::with_capacity(A::SIZE);
        suffix.write_le(&mut field);
        out.store_at(written.addr, at, &field)
    }
}
