//! Export of a mutable trie to the flat format.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use tracing::debug;

use crate::codec::{DataCodec, MmapTrieCodec, TrieCodec};
use crate::config::Config;
use crate::encoding::Offset;
use crate::error::{Error, Result};
use crate::node::{MutNode, Written};
use crate::store::{FileStore, NodeId, SimpleStore};

use super::Ptrie;

impl<N: MutNode> Ptrie<SimpleStore<N>> {
    /// Write every node to `out` and return the root address.
    ///
    /// Nodes are written children first so a parent embeds final child
    /// addresses. The walk keeps its own stack, so key length is bounded by
    /// memory only. Suffix links are patched in a second pass once every
    /// node has an address. Each node is written once; resolving the same
    /// node again returns its recorded address.
    pub fn write_nodes<A, C, W>(&self, codec: &C, out: &mut FileStore<A, W>) -> Result<A>
    where
        A: Offset,
        C: DataCodec<A, Data = N::Data>,
        W: Write + Seek,
    {
        let mut written: Vec<Option<Written<A>>> = vec![None; self.store.capacity()];
        // (node, index of the next child to write)
        let mut stack: Vec<(NodeId, usize)> = vec![(self.root, 0)];

        while let Some((id, next)) = stack.last_mut() {
            let id = *id;
            let node = self.store.get(id)?;
            if let Some(&child) = node.children().value(*next) {
                *next += 1;
                if written[child.index()].is_none() {
                    stack.push((child, 0));
                }
                continue;
            }

            let w = node.write_to_store(
                codec,
                |child, _: &mut FileStore<A, W>| {
                    written[child.index()]
                        .map(|w| w.addr)
                        .ok_or(Error::NullPointer)
                },
                out,
            )?;
            written[id.index()] = Some(w);
            stack.pop();
        }
        let root = written[self.root.index()].ok_or(Error::NullPointer)?.addr;

        if N::LINKED {
            for (id, node) in self.store.iter() {
                let (Some(at), Some(suffix)) = (written[id.index()], node.suffix()) else {
                    continue;
                };
                let target = written[suffix.index()].ok_or(Error::NullPointer)?;
                node.store_links(&at, target.addr, out)?;
            }
        }
        Ok(root)
    }

    /// Write the nodes followed by the trailer of `trie_codec`.
    ///
    /// Returns the root address.
    pub fn store_trie<A, C, T, W>(
        &self,
        codec: &C,
        trie_codec: &T,
        out: &mut FileStore<A, W>,
    ) -> Result<A>
    where
        A: Offset,
        C: DataCodec<A, Data = N::Data>,
        T: TrieCodec<A>,
        W: Write + Seek,
    {
        let root = self.write_nodes(codec, out)?;
        trie_codec.encode_root(root, out)?;
        Ok(root)
    }

    /// Export to `path` with the default trailer and configuration.
    pub fn write_to_file<A, C>(&self, path: impl AsRef<Path>, codec: &C) -> Result<A>
    where
        A: Offset,
        C: DataCodec<A, Data = N::Data>,
    {
        self.write_to_file_with(path, codec, &Config::default())
    }

    /// Export to `path`, truncating any existing file.
    pub fn write_to_file_with<A, C>(
        &self,
        path: impl AsRef<Path>,
        codec: &C,
        config: &Config,
    ) -> Result<A>
    where
        A: Offset,
        C: DataCodec<A, Data = N::Data>,
    {
        let path = path.as_ref();
        debug!(path = %path.display(), nodes = self.store.count(), "exporting trie");

        let mut out = FileStore::with_capacity(config.write_buffer, File::create(path)?)?;
        let root = self.store_trie(codec, &MmapTrieCodec, &mut out)?;
        let size = out.position();
        let file = out.finish()?;
        if config.sync_on_finish {
            file.sync_all()?;
        }

        debug!(path = %path.display(), bytes = size, root = %root, "trie exported");
        Ok(root)
    }
}
