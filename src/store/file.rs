//! Output store used while exporting a trie.

use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::marker::PhantomData;

use crate::encoding::Offset;
use crate::error::Result;

/// Default write buffer capacity.
pub(crate) const DEFAULT_BUFFER: usize = 64 * 1024;

/// Append-only sink handing out file offsets of type `A`.
///
/// Offset 0 is taken by a one-byte lead marker, so no chunk is ever stored at
/// address 0 and a zero address always means "absent".
pub struct FileStore<A, W: Write> {
    out: BufWriter<W>,
    pos: u64,
    _addr: PhantomData<A>,
}

impl<A: Offset, W: Write + Seek> FileStore<A, W> {
    /// Lead byte written at the start of every exported trie.
    pub const LEAD: u8 = b'F';

    pub fn new(inner: W) -> Result<Self> {
        Self::with_capacity(DEFAULT_BUFFER, inner)
    }

    pub fn with_capacity(capacity: usize, mut inner: W) -> Result<Self> {
        let pos = inner.stream_position()?;
        let mut store = Self {
            out: BufWriter::with_capacity(capacity, inner),
            pos,
            _addr: PhantomData,
        };
        store.store(&[&[Self::LEAD][..]])?;
        Ok(store)
    }

    /// Current end of the output.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Append `chunks` contiguously and return the address of the first
    /// non-empty one, or zero when all are empty.
    pub fn store(&mut self, chunks: &[&[u8]]) -> Result<A> {
        let mut addr = A::ZERO;
        for chunk in chunks.iter().filter(|c| !c.is_empty()) {
            if addr.is_zero() {
                addr = A::from_u64(self.pos)?;
            }
            self.out.write_all(chunk)?;
            self.pos += chunk.len() as u64;
        }
        Ok(addr)
    }

    /// Overwrite bytes at `addr + offset` inside already stored output.
    pub fn store_at(&mut self, addr: A, offset: usize, bytes: &[u8]) -> Result<()> {
        let at = addr.to_u64() + offset as u64;
        debug_assert!(at + bytes.len() as u64 <= self.pos);
        self.out.seek(SeekFrom::Start(at))?;
        self.out.write_all(bytes)?;
        self.out.seek(SeekFrom::Start(self.pos))?;
        Ok(())
    }

    /// Flush buffered output and return the sink.
    pub fn finish(self) -> Result<W> {
        self.out.into_inner().map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lead_byte_reserves_zero() {
        let mut store: FileStore<u32, _> = FileStore::new(Cursor::new(Vec::new())).unwrap();
        assert_eq!(store.position(), 1);
        let a = store.store(&[b"abc".as_slice()]).unwrap();
        assert_eq!(a, 1);
        let buf = store.finish().unwrap().into_inner();
        assert_eq!(buf, b"Fabc");
    }

    #[test]
    fn test_store_returns_first_non_empty() {
        let mut store: FileStore<u64, _> = FileStore::new(Cursor::new(Vec::new())).unwrap();
        assert_eq!(store.store(&[b"".as_slice(), b""]).unwrap(), 0);
        assert_eq!(store.store(&[b"".as_slice(), b"xy", b"z"]).unwrap(), 1);
        assert_eq!(store.store(&[b"w".as_slice()]).unwrap(), 4);
    }

    #[test]
    fn test_store_at_patches_in_place() {
        let mut store: FileStore<u32, _> = FileStore::new(Cursor::new(Vec::new())).unwrap();
        let a = store.store(&[b"0000".as_slice()]).unwrap();
        store.store(&[b"tail".as_slice()]).unwrap();
        store.store_at(a, 1, b"12").unwrap();
        store.store(&[b"!".as_slice()]).unwrap();
        let buf = store.finish().unwrap().into_inner();
        assert_eq!(buf, b"F0120tail!");
    }

    #[test]
    fn test_offset_overflow() {
        let mut store: FileStore<u16, _> = FileStore::new(Cursor::new(Vec::new())).unwrap();
        store.store(&[vec![0u8; u16::MAX as usize].as_slice()]).unwrap();
        assert!(matches!(
            store.store(&[b"x".as_slice()]),
            Err(crate::Error::OffsetOverflow(65536))
        ));
    }
}
