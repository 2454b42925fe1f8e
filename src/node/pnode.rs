//! Mutable nodes.

use std::fmt;

use crate::alphabet::Alphabet;
use crate::error::Result;
use crate::sparse::SVector;
use crate::store::NodeId;

use super::{LinkedNode, MutNode, TrieNode};

/// Mutable trie node: payload plus sparse children.
pub struct PNode<D, X: Alphabet> {
    data: D,
    children: SVector<NodeId, X>,
}

impl<D: Default, X: Alphabet> Default for PNode<D, X> {
    fn default() -> Self {
        Self {
            data: D::default(),
            children: SVector::new(),
        }
    }
}

impl<D: fmt::Debug, X: Alphabet> fmt::Debug for PNode<D, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PNode")
            .field("data", &self.data)
            .field("children", &self.children)
            .finish()
    }
}

impl<D, X: Alphabet> TrieNode for PNode<D, X> {
    type Ptr = NodeId;
    type Data = D;

    #[inline]
    fn data(&self) -> &D {
        &self.data
    }

    #[inline]
    fn child(&self, symbol: u8) -> Result<Option<NodeId>> {
        Ok(self.children.get(symbol)?.copied())
    }

    fn for_each_child<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(u8, NodeId) -> Result<()>,
    {
        self.children.iter().try_for_each(|(s, &c)| f(s, c))
    }
}

impl<D: Default, X: Alphabet> MutNode for PNode<D, X> {
    type Alphabet = X;
    const LINKED: bool = false;

    #[inline]
    fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    #[inline]
    fn children(&self) -> &SVector<NodeId, X> {
        &self.children
    }

    #[inline]
    fn children_mut(&mut self) -> &mut SVector<NodeId, X> {
        &mut self.children
    }
}

/// Mutable node with a suffix link, for multi-pattern matching.
pub struct PNodeSs<D, X: Alphabet> {
    data: D,
    suffix: NodeId,
    shift: u8,
    children: SVector<NodeId, X>,
}

impl<D: Default, X: Alphabet> Default for PNodeSs<D, X> {
    fn default() -> Self {
        Self {
            data: D::default(),
            suffix: NodeId::NULL,
            shift: 0,
            children: SVector::new(),
        }
    }
}

impl<D: fmt::Debug, X: Alphabet> fmt::Debug for PNodeSs<D, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PNodeSs")
            .field("data", &self.data)
            .field("suffix", &self.suffix)
            .field("shift", &self.shift)
            .field("children", &self.children)
            .finish()
    }
}

impl<D, X: Alphabet> TrieNode for PNodeSs<D, X> {
    type Ptr = NodeId;
    type Data = D;

    #[inline]
    fn data(&self) -> &D {
        &self.data
    }

    #[inline]
    fn child(&self, symbol: u8) -> Result<Option<NodeId>> {
        Ok(self.children.get(symbol)?.copied())
    }

    fn for_each_child<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(u8, NodeId) -> Result<()>,
    {
        self.children.iter().try_for_each(|(s, &c)| f(s, c))
    }

    #[inline]
    fn suffix(&self) -> Option<NodeId> {
        (!self.suffix.is_null()).then_some(self.suffix)
    }

    #[inline]
    fn shift(&self) -> u8 {
        self.shift
    }
}

impl<D: Default, X: Alphabet> MutNode for PNodeSs<D, X> {
    type Alphabet = X;
    const LINKED: bool = true;

    #[inline]
    fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    #[inline]
    fn children(&self) -> &SVector<NodeId, X> {
        &self.children
    }

    #[inline]
    fn children_mut(&mut self) -> &mut SVector<NodeId, X> {
        &mut self.children
    }

    fn set_suffix(&mut self, suffix: Option<NodeId>, shift: u8) {
        self.suffix = suffix.unwrap_or(NodeId::NULL);
        self.shift = if suffix.is_some() { shift } else { 0 };
    }
}

impl<D, X: Alphabet> LinkedNode for PNodeSs<D, X> {}
