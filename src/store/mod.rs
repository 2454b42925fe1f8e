//! Node stores.
//!
//! A store owns the nodes of a trie and translates store pointers into node
//! views. The trie engine is written once against [`NodeStore`]:
//!
//! - [`SimpleStore`]: arena of mutable nodes addressed by [`NodeId`], used
//!   while building a trie in memory
//! - [`FlatStore`]: bounds-checked read-only view over an exported byte region,
//!   addressed by file offset
//! - [`FileStore`]: append-only output sink used while exporting

use std::fmt;

use crate::error::Result;
use crate::node::TrieNode;

mod file;
mod flat;
mod simple;

pub(crate) use file::DEFAULT_BUFFER;
pub use file::FileStore;
pub(crate) use flat::check_span;
pub use flat::FlatStore;
pub use simple::{NodeId, SimpleStore};

/// Storage layer shared by mutable and mapped tries.
pub trait NodeStore {
    /// Store pointer type (arena index or file offset).
    type Ptr: Copy + Eq + fmt::Debug;

    /// Payload type seen by visitors.
    type Data;

    /// Node view produced by [`node`](Self::node).
    type Node<'a>: TrieNode<Ptr = Self::Ptr, Data = Self::Data>
    where
        Self: 'a;

    /// The null pointer value.
    const NULL: Self::Ptr;

    /// Whether the store supports allocation.
    const DYNAMIC: bool;

    /// Translate a pointer into a node view.
    ///
    /// Fails with [`Error::NullPointer`](crate::Error::NullPointer) for
    /// [`NULL`](Self::NULL) and with
    /// [`Error::BadOffset`](crate::Error::BadOffset) when the node does not
    /// fit the backing region.
    fn node(&self, ptr: Self::Ptr) -> Result<Self::Node<'_>>;
}

/// Stores whose nodes carry suffix links.
///
/// Multi-pattern scanning with [`fold_full`](crate::Ptrie::fold_full) is only
/// available over these stores.
pub trait LinkedStore: NodeStore {}
