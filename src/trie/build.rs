//! In-memory construction.

use std::collections::VecDeque;

use smallvec::SmallVec;
use tracing::debug;

use crate::error::{Error, Result};
use crate::node::{LinkedNode, MutNode};
use crate::store::{NodeId, SimpleStore};

use super::Ptrie;

impl<N: MutNode> Default for Ptrie<SimpleStore<N>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: MutNode> Ptrie<SimpleStore<N>> {
    /// Empty trie holding only its root.
    pub fn new() -> Self {
        let (store, root) = SimpleStore::with_root();
        Self { store, root }
    }

    /// Store `data` at `key`, replacing any existing payload.
    ///
    /// Nodes are created for every missing prefix of `key`.
    pub fn store(&mut self, key: &[u8], data: N::Data) -> Result<()> {
        let node = self.path_to_node(key)?;
        *self.store.get_mut(node)?.data_mut() = data;
        Ok(())
    }

    /// Merge `data` into the payload at `key`, creating the path if needed.
    pub fn update<T, M>(&mut self, key: &[u8], data: T, merge: M) -> Result<()>
    where
        M: FnOnce(&mut N::Data, T),
    {
        let node = self.path_to_node(key)?;
        merge(self.store.get_mut(node)?.data_mut(), data);
        Ok(())
    }

    /// Drop every node except the root and reset the root payload.
    pub fn clear(&mut self) {
        let mut stack: Vec<NodeId> = Vec::new();
        if let Ok(root) = self.store.get_mut(self.root) {
            stack.extend(root.children().values().copied());
            *root = N::default();
        }
        while let Some(id) = stack.pop() {
            if let Ok(node) = self.store.get(id) {
                stack.extend(node.children().values().copied());
            }
            self.store.deallocate(id);
        }
    }

    fn path_to_node(&mut self, key: &[u8]) -> Result<NodeId> {
        let mut cur = self.root;
        for &symbol in key {
            let parent = self.store.get(cur)?;
            let pos = parent.children().find(symbol)?;
            cur = if pos.present {
                *parent.children().at(&pos)
            } else {
                let child = self.store.allocate()?;
                self.store.get_mut(cur)?.children_mut().insert(pos, child);
                child
            };
        }
        Ok(cur)
    }
}

impl<N: MutNode + LinkedNode> Ptrie<SimpleStore<N>> {
    /// Compute suffix links for every node.
    ///
    /// Runs breadth-first so that a node's parent is linked before the node
    /// itself. The link of a node is the longest proper suffix of its key
    /// that is also a node; the root is never used as a link. Call again
    /// after storing more keys.
    pub fn make_links(&mut self) -> Result<()> {
        let mut depth = vec![0usize; self.store.capacity()];
        let mut queue = VecDeque::from([self.root]);
        let mut linked = 0usize;

        while let Some(parent) = queue.pop_front() {
            let children: SmallVec<[(u8, NodeId); 16]> = self
                .store
                .get(parent)?
                .children()
                .iter()
                .map(|(s, &c)| (s, c))
                .collect();

            for (symbol, child) in children {
                depth[child.index()] = depth[parent.index()] + 1;
                let suffix = if parent == self.root {
                    None
                } else {
                    self.suffix_of(parent, symbol)?
                };
                let shift = match suffix {
                    Some(s) => {
                        let dist = depth[child.index()] - depth[s.index()];
                        u8::try_from(dist).map_err(|_| Error::ShiftOverflow(dist))?
                    }
                    None => 0,
                };
                self.store.get_mut(child)?.set_suffix(suffix, shift);
                linked += usize::from(suffix.is_some());
                queue.push_back(child);
            }
        }

        debug!(nodes = self.store.count(), linked, "suffix links built");
        Ok(())
    }

    /// Longest proper suffix node for the child of `parent` at `symbol`:
    /// follow the parent's suffix chain until a node has that edge.
    fn suffix_of(&self, parent: NodeId, symbol: u8) -> Result<Option<NodeId>> {
        let mut link = self.store.get(parent)?.suffix();
        loop {
            let base = link.unwrap_or(self.root);
            if let Some(next) = self.store.get(base)?.child(symbol)? {
                return Ok(Some(next));
            }
            match link {
                Some(s) => link = self.store.get(s)?.suffix(),
                None => return Ok(None),
            }
        }
    }
}
