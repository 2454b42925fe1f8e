//! Memory-mapped read-only tries.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};
use tracing::debug;

use crate::codec::{MmapTrieCodec, TrieCodec};
use crate::config::Config;
use crate::error::Result;
use crate::node::FlatNode;
use crate::store::FlatStore;
use crate::trie::Ptrie;

/// A trie file mapped read-only into memory.
///
/// Dereferences to the underlying [`Ptrie`], so the whole read surface
/// (`fold`, `fold_full`, `foreach`, `lookup`) is available. Any number of
/// threads may query the same mapping.
pub struct MmapTrie<N: FlatNode> {
    trie: Ptrie<FlatStore<Mmap, N>>,
}

impl<N: FlatNode> MmapTrie<N> {
    /// Map `path` and locate the root with the default trailer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            path,
            |region| MmapTrieCodec.find_root(region),
            &Config::default(),
        )
    }

    /// Map `path` and locate the root with `root_finder`.
    pub fn open_with<F>(path: impl AsRef<Path>, root_finder: F, config: &Config) -> Result<Self>
    where
        F: FnOnce(&[u8]) -> Result<N::Addr>,
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut options = MmapOptions::new();
        if config.populate {
            options.populate();
        }
        // SAFETY: the mapping is read-only and every access goes through
        // bounds-checked decoding; the file must not be truncated while mapped.
        let map = unsafe { options.map(&file)? };
        let size = map.len();

        let trie = Ptrie::from_region(map, root_finder)?;
        debug!(path = %path.display(), size, root = %trie.root(), "trie mapped");
        Ok(Self { trie })
    }

    /// Size of the mapped file in bytes.
    pub fn len(&self) -> usize {
        self.trie.node_store().bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<N: FlatNode> Deref for MmapTrie<N> {
    type Target = Ptrie<FlatStore<Mmap, N>>;

    fn deref(&self) -> &Self::Target {
        &self.trie
    }
}
