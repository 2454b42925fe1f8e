//! The trie engine.
//!
//! [`Ptrie`] pairs a [`NodeStore`] with a root pointer. The read algorithms
//! (`fold`, `fold_full`, `foreach`, `lookup`) are written once against the
//! store abstraction and run unchanged over in-memory and mapped tries. The
//! mutable surface (`store`, `update`, `make_links`, export) lives on
//! `Ptrie<SimpleStore<_>>`.

use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::node::{FlatNode, TrieNode};
use crate::store::{FlatStore, LinkedStore, NodeStore};

mod build;
mod export;

/// Traversal order for [`Ptrie::foreach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    /// Children before their parent (post-order).
    Up,
    /// Parent before its children (pre-order).
    Down,
}

/// Position of a visited node in the scanned input.
///
/// The node's key is `input[begin..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
    /// Whether input remains after `end`.
    pub has_next: bool,
}

/// A node on the `foreach` stack and the cursor into its children.
struct Frame<'s, S: NodeStore + 's> {
    node: S::Node<'s>,
    children: SmallVec<[(u8, S::Ptr); 8]>,
    next: usize,
}

/// Persistent prefix trie over a node store.
pub struct Ptrie<S: NodeStore> {
    store: S,
    root: S::Ptr,
}

/// Trie over a flat byte region.
pub type FlatTrie<B, N> = Ptrie<FlatStore<B, N>>;

impl<S: NodeStore> fmt::Debug for Ptrie<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ptrie").field("root", &self.root).finish_non_exhaustive()
    }
}

impl<S: NodeStore> Ptrie<S> {
    /// Bind a trie to an existing store and root.
    ///
    /// Fails if `root` does not resolve to a node.
    pub fn from_parts(store: S, root: S::Ptr) -> Result<Self> {
        store.node(root)?;
        Ok(Self { store, root })
    }

    #[inline]
    pub fn node_store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn root(&self) -> S::Ptr {
        self.root
    }

    /// Walk the path of `key` from the root, visiting the node of every
    /// prefix of `key` present in the trie, shortest first.
    ///
    /// `visit` receives the accumulator, the node payload, the store and the
    /// span `[0, prefix length)`; returning `false` stops the walk.
    pub fn fold<A, F>(&self, key: &[u8], acc: &mut A, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut A, &S::Data, &S, Span) -> Result<bool>,
    {
        let mut node = self.store.node(self.root)?;
        for (i, &symbol) in key.iter().enumerate() {
            let Some(next) = node.child(symbol)? else {
                break;
            };
            node = self.store.node(next)?;
            let span = Span {
                begin: 0,
                end: i + 1,
                has_next: i + 1 < key.len(),
            };
            if !visit(acc, node.data(), &self.store, span)? {
                break;
            }
        }
        Ok(())
    }

    /// Longest prefix of `key` whose payload is not empty.
    pub fn lookup<P>(&self, key: &[u8], mut is_empty: P) -> Result<Option<S::Data>>
    where
        P: FnMut(&S::Data) -> bool,
        S::Data: Clone,
    {
        let mut found = None;
        self.fold(key, &mut found, |found, data, _, _| {
            if !is_empty(data) {
                *found = Some(data.clone());
            }
            Ok(true)
        })?;
        Ok(found)
    }

    /// Like [`lookup`](Self::lookup), but `is_empty` is also told whether
    /// the candidate prefix is the whole key.
    pub fn lookup_exact<P>(&self, key: &[u8], mut is_empty: P) -> Result<Option<S::Data>>
    where
        P: FnMut(&S::Data, bool) -> bool,
        S::Data: Clone,
    {
        let mut found = None;
        self.fold(key, &mut found, |found, data, _, span| {
            if !is_empty(data, !span.has_next) {
                *found = Some(data.clone());
            }
            Ok(true)
        })?;
        Ok(found)
    }

    /// Visit every node with its key, in the given order.
    ///
    /// Siblings are visited in symbol order. The walk keeps its own stack,
    /// so key length is bounded by memory only.
    pub fn foreach<'s, F>(&'s self, dir: Dir, mut visit: F) -> Result<()>
    where
        S: 's,
        F: FnMut(&[u8], &S::Node<'s>, &'s S) -> Result<()>,
    {
        let mut key: SmallVec<[u8; 64]> = SmallVec::new();
        let mut stack = vec![self.frame(self.root)?];
        if dir == Dir::Down {
            visit(&key[..], &stack[0].node, &self.store)?;
        }

        while let Some(top) = stack.last_mut() {
            if let Some(&(symbol, child)) = top.children.get(top.next) {
                top.next += 1;
                key.push(symbol);
                let frame = self.frame(child)?;
                if dir == Dir::Down {
                    visit(&key[..], &frame.node, &self.store)?;
                }
                stack.push(frame);
                continue;
            }

            if let Some(done) = stack.pop() {
                if dir == Dir::Up {
                    visit(&key[..], &done.node, &self.store)?;
                }
            }
            key.pop();
        }
        Ok(())
    }

    fn frame(&self, ptr: S::Ptr) -> Result<Frame<'_, S>> {
        let node = self.store.node(ptr)?;
        let mut children = SmallVec::new();
        node.for_each_child(|symbol, child| {
            children.push((symbol, child));
            Ok(())
        })?;
        Ok(Frame {
            node,
            children,
            next: 0,
        })
    }

    /// Node reached by exactly `key`, if any.
    pub fn find_exact(&self, key: &[u8]) -> Result<Option<S::Ptr>> {
        let mut ptr = self.root;
        for &symbol in key {
            match self.store.node(ptr)?.child(symbol)? {
                Some(next) => ptr = next,
                None => return Ok(None),
            }
        }
        Ok(Some(ptr))
    }
}

impl<S: LinkedStore> Ptrie<S> {
    /// Scan `key` for every stored key occurring in it.
    ///
    /// Follows child edges while they match and suffix links when they do
    /// not. After each step the current node and its whole suffix chain are
    /// visited with their span in `key`, until `visit` returns `false`.
    /// Intermediate nodes are visited too; filter on the payload.
    pub fn fold_full<A, F>(&self, key: &[u8], acc: &mut A, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut A, &S::Data, &S, Span) -> Result<bool>,
    {
        let mut ptr = self.root;
        let mut node = self.store.node(ptr)?;
        let mut begin = 0usize;
        let mut end = 0usize;

        while end < key.len() {
            if let Some(next) = node.child(key[end])? {
                ptr = next;
                node = self.store.node(next)?;
                end += 1;
                let has_next = end < key.len();

                let mut start = begin;
                let mut cur = self.store.node(next)?;
                loop {
                    let span = Span {
                        begin: start,
                        end,
                        has_next,
                    };
                    if !visit(acc, cur.data(), &self.store, span)? {
                        break;
                    }
                    let Some(suffix) = cur.suffix() else {
                        break;
                    };
                    start += checked_shift(cur.shift(), end - start)?;
                    cur = self.store.node(suffix)?;
                }
                continue;
            }

            match node.suffix() {
                Some(suffix) => {
                    begin += checked_shift(node.shift(), end - begin)?;
                    ptr = suffix;
                    node = self.store.node(suffix)?;
                }
                None if ptr == self.root => {
                    begin += 1;
                    end += 1;
                }
                None => {
                    ptr = self.root;
                    node = self.store.node(ptr)?;
                    begin = end;
                }
            }
        }
        Ok(())
    }
}

/// A suffix link always lands on a shorter, non-root node.
#[inline]
fn checked_shift(shift: u8, depth: usize) -> Result<usize> {
    let n = shift as usize;
    if n == 0 || n >= depth {
        return Err(Error::BadSuffix { shift });
    }
    Ok(n)
}

impl<B: Deref<Target = [u8]>, N: FlatNode> Ptrie<FlatStore<B, N>> {
    /// Trie over an exported region, with the root located by `root_finder`.
    pub fn from_region<F>(region: B, root_finder: F) -> Result<Self>
    where
        F: FnOnce(&[u8]) -> Result<N::Addr>,
    {
        let root = root_finder(&region)?;
        Self::from_parts(FlatStore::new(region), root)
    }
}
