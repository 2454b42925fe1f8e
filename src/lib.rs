//! # ptrie
//!
//! Persistent prefix tries: build in memory, export to a compact flat file,
//! query the file in place through a memory map.
//!
//! The same trie engine runs over two stores:
//! - [`SimpleStore`]: mutable nodes addressed by [`NodeId`], used to build
//! - [`FlatStore`]: read-only nodes decoded from a byte region, addressed by
//!   file offset
//!
//! Suffix-linked tries ([`PNodeSs`] nodes) additionally support Aho-Corasick
//! multi-pattern scanning with [`Ptrie::fold_full`].
//!
//! ## Example
//!
//! ```rust
//! use ptrie::{DigitTrie, Span};
//!
//! let mut trie: DigitTrie<String> = DigitTrie::new();
//! trie.store(b"123", "three".into()).unwrap();
//! trie.store(b"1234", "four".into()).unwrap();
//! trie.store(b"12345", "five".into()).unwrap();
//!
//! let mut longest = String::new();
//! trie.fold(b"1234567", &mut longest, |acc, data, _, _: Span| {
//!     if !data.is_empty() {
//!         *acc = data.clone();
//!     }
//!     Ok(true)
//! })
//! .unwrap();
//! assert_eq!(longest, "five");
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

pub mod alphabet;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod mmap;
pub mod node;
pub mod sparse;
pub mod store;
pub mod trie;

pub use alphabet::{Alphabet, Bytes, Digits};
pub use codec::{DataCodec, InlineCodec, MmapTrieCodec, StringCodec, TrieCodec};
pub use config::Config;
pub use encoding::{FixedField, Offset};
pub use error::{Error, Result};
pub use mmap::MmapTrie;
pub use node::{FlatNode, LinkedNode, MutNode, PNode, PNodeRo, PNodeSs, PNodeSsRo, TrieNode};
pub use store::{FileStore, FlatStore, LinkedStore, NodeId, NodeStore, SimpleStore};
pub use trie::{Dir, FlatTrie, Ptrie, Span};

// =============================================================================
// Presets
// =============================================================================

/// Mutable trie keyed by decimal digits.
pub type DigitTrie<D> = Ptrie<SimpleStore<PNode<D, Digits>>>;

/// Mutable suffix-linked trie keyed by decimal digits.
pub type DigitAcTrie<D> = Ptrie<SimpleStore<PNodeSs<D, Digits>>>;

/// Mutable trie keyed by arbitrary bytes.
pub type ByteTrie<D> = Ptrie<SimpleStore<PNode<D, Bytes>>>;

/// Mutable suffix-linked trie keyed by arbitrary bytes.
pub type ByteAcTrie<D> = Ptrie<SimpleStore<PNodeSs<D, Bytes>>>;

/// Mapped export of a [`DigitTrie`]; `D` is the stored payload field
/// (the string offset for [`StringCodec`]).
pub type MappedDigitTrie<A = u32, D = A> = MmapTrie<PNodeRo<A, D, Digits>>;

/// Mapped export of a [`DigitAcTrie`].
pub type MappedDigitAcTrie<A = u32, D = A> = MmapTrie<PNodeSsRo<A, D, Digits>>;

/// Mapped export of a [`ByteTrie`].
pub type MappedByteTrie<A = u32, D = A> = MmapTrie<PNodeRo<A, D, Bytes>>;

/// Mapped export of a [`ByteAcTrie`].
pub type MappedByteAcTrie<A = u32, D = A> = MmapTrie<PNodeSsRo<A, D, Bytes>>;

#[cfg(test)]
mod proptests;
