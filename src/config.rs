//! Export and mapping options.

use crate::store::DEFAULT_BUFFER;

/// Configuration for writing and opening trie files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Write buffer capacity used during export
    pub write_buffer: usize,
    /// Flush the exported file to disk before returning
    pub sync_on_finish: bool,
    /// Pre-fault the whole mapping on open
    pub populate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            write_buffer: DEFAULT_BUFFER,
            sync_on_finish: false,
            populate: false,
        }
    }
}
