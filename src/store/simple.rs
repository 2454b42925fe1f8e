//! Arena store for mutable nodes.

use std::fmt;

use crate::error::{Error, Result};
use crate::node::{LinkedNode, MutNode};

use super::{LinkedStore, NodeStore};

/// Index of a node in a [`SimpleStore`].
///
/// Slot 0 is reserved, so `NodeId(0)` is the null pointer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(u32);

impl NodeId {
    /// The null node id.
    pub const NULL: NodeId = NodeId(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena of mutable nodes with a free list and a live-node counter.
pub struct SimpleStore<N> {
    slots: Vec<Option<N>>,
    free: Vec<NodeId>,
    live: usize,
}

impl<N> Default for SimpleStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> SimpleStore<N> {
    pub fn new() -> Self {
        Self {
            slots: vec![None],
            free: Vec::new(),
            live: 0,
        }
    }

    /// Store holding a single default node, returned with it.
    pub(crate) fn with_root() -> (Self, NodeId)
    where
        N: Default,
    {
        let store = Self {
            slots: vec![None, Some(N::default())],
            free: Vec::new(),
            live: 1,
        };
        (store, NodeId(1))
    }

    /// Number of live nodes.
    #[inline]
    pub fn count(&self) -> usize {
        self.live
    }

    /// Allocate a default node.
    pub fn allocate(&mut self) -> Result<NodeId>
    where
        N: Default,
    {
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(N::default());
                id
            }
            None => {
                let raw = u32::try_from(self.slots.len())
                    .map_err(|_| Error::OffsetOverflow(self.slots.len() as u64))?;
                self.slots.push(Some(N::default()));
                NodeId(raw)
            }
        };
        self.live += 1;
        Ok(id)
    }

    /// Release a node. Releasing a null or already released id is a no-op.
    pub fn deallocate(&mut self, id: NodeId) {
        if id.is_null() {
            return;
        }
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if slot.take().is_some() {
                self.free.push(id);
                self.live -= 1;
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Result<&N> {
        if id.is_null() {
            return Err(Error::NullPointer);
        }
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(Error::NullPointer)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut N> {
        if id.is_null() {
            return Err(Error::NullPointer);
        }
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(Error::NullPointer)
    }

    /// Live nodes with their ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Upper bound (exclusive) of allocated node indices.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<N: MutNode> NodeStore for SimpleStore<N> {
    type Ptr = NodeId;
    type Data = N::Data;
    type Node<'a> = &'a N where Self: 'a;

    const NULL: NodeId = NodeId::NULL;
    const DYNAMIC: bool = true;

    #[inline]
    fn node(&self, ptr: NodeId) -> Result<&N> {
        self.get(ptr)
    }
}

impl<N: MutNode + LinkedNode> LinkedStore for SimpleStore<N> {}
