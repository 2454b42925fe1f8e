//! Fixed-width field encoding for the exported trie format.
//!
//! Every field of a serialized node is written little-endian with no padding,
//! so a node blob is decoded field by field instead of being reinterpreted as
//! an in-memory struct:
//! - `FixedField` covers payload headers, shifts and masks
//! - `Offset` covers the address type chosen for a file (`u32` or `u64`)

use std::fmt;
use std::hash::Hash;

use crate::error::{Error, Result};

/// A value with a fixed little-endian byte representation.
pub trait FixedField: Copy + Sized + 'static {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decode from the first `SIZE` bytes of `buf`.
    ///
    /// Callers bounds-check `buf` before decoding.
    fn read_le(buf: &[u8]) -> Self;

    /// Append the encoded value to `out`.
    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_fixed_field {
    ($($t:ty),*) => {
        $(
            impl FixedField for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                #[inline]
                fn read_le(buf: &[u8]) -> Self {
                    let mut b = [0u8; std::mem::size_of::<$t>()];
                    b.copy_from_slice(&buf[..Self::SIZE]);
                    <$t>::from_le_bytes(b)
                }

                #[inline]
                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_fixed_field!(u8, u16, u32, u64, i32, i64);

/// Integer type used for node and payload addresses inside a trie file.
///
/// Zero is reserved: the output store never places anything at offset 0, so
/// a zero offset always means "absent".
pub trait Offset:
    FixedField + Eq + Ord + Hash + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The null address.
    const ZERO: Self;

    /// Widen to `u64`.
    fn to_u64(self) -> u64;

    /// Narrow from an output position, failing when it does not fit.
    fn from_u64(v: u64) -> Result<Self>;

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_offset {
    ($($t:ty),*) => {
        $(
            impl Offset for $t {
                const ZERO: Self = 0;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(v: u64) -> Result<Self> {
                    <$t>::try_from(v).map_err(|_| Error::OffsetOverflow(v))
                }
            }
        )*
    };
}

impl_offset!(u16, u32, u64);

/// Read a field at `at`, or `None` when it does not fit in `buf`.
#[inline]
pub fn read_at<T: FixedField>(buf: &[u8], at: usize) -> Option<T> {
    let end = at.checked_add(T::SIZE)?;
    buf.get(at..end).map(T::read_le)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let mut out = Vec::new();
        0x0403_0201u32.write_le(&mut out);
        7u8.write_le(&mut out);
        assert_eq!(out, [1, 2, 3, 4, 7]);
        assert_eq!(u32::read_le(&out), 0x0403_0201);
        assert_eq!(read_at::<u8>(&out, 4), Some(7));
    }

    #[test]
    fn test_read_at_bounds() {
        let buf = [0u8; 8];
        assert_eq!(read_at::<u64>(&buf, 0), Some(0));
        assert_eq!(read_at::<u64>(&buf, 1), None);
        assert_eq!(read_at::<u32>(&buf, usize::MAX), None);
    }

    #[test]
    fn test_offset_narrowing() {
        assert_eq!(u32::from_u64(17).unwrap(), 17);
        assert!(matches!(
            u32::from_u64(1 << 33),
            Err(Error::OffsetOverflow(v)) if v == 1 << 33
        ));
        assert!(u16::ZERO.is_zero());
    }
}
