//! Error handling for trie construction, export and mapped access.

use thiserror::Error;

/// Error type for all trie operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O failure while opening, mapping or writing a trie file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Offset translation outside of the backing region.
    #[error("bad offset {offset}: region size {size}, need {need} bytes")]
    BadOffset {
        /// Offset requested
        offset: u64,
        /// Size of the region
        size: u64,
        /// Number of bytes that must fit at `offset`
        need: usize,
    },

    /// Null reference where a node was required.
    #[error("null store pointer")]
    NullPointer,

    /// Symbol outside of the trie alphabet.
    #[error("bad symbol 0x{0:02x}")]
    BadSymbol(u8),

    /// Child mask with bits outside of the alphabet.
    #[error("bad child mask")]
    BadMask,

    /// Region too small to hold the root trailer.
    #[error("short file: {size} bytes, need at least {need}")]
    ShortFile {
        /// Size of the region
        size: u64,
        /// Minimal size required
        need: usize,
    },

    /// Output position does not fit the offset type.
    #[error("offset {0} does not fit the address type")]
    OffsetOverflow(u64),

    /// Node has more children than the alphabet allows.
    #[error("invalid number of node children: {count} (capacity {capacity})")]
    TooManyChildren {
        /// Children found
        count: usize,
        /// Alphabet capacity
        capacity: usize,
    },

    /// Suffix link distance does not fit the shift field.
    #[error("suffix distance {0} does not fit the shift field")]
    ShiftOverflow(usize),

    /// Suffix link whose shift cannot shorten the current match.
    #[error("suffix link with invalid shift {shift}")]
    BadSuffix {
        /// Shift read from the node
        shift: u8,
    },

    /// String payload that cannot be stored NUL-terminated.
    #[error("string payload has a NUL byte at {0}")]
    InteriorNul(usize),
}

impl Error {
    pub(crate) fn bad_offset(offset: u64, size: u64, need: usize) -> Self {
        Error::BadOffset { offset, size, need }
    }
}

/// Result type for trie operations.
pub type Result<T> = std::result::Result<T, Error>;
