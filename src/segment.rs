//! Segment
//!
//! Pairs one index with one store under a shared zero-padded identifier and
//! routes writes and reads between them in the correct order.

use std::path::Path;

use crate::config::Config;
use crate::error::{Result, WalError};
use crate::index::Index;
use crate::store::Store;

/// One index + store pair holding a contiguous id range of the log
pub struct Segment {
    /// Zero-padded numeric identifier shared by both files
    id: String,

    index: Index,
    store: Store,
}

impl Segment {
    /// Open a segment from its two files
    ///
    /// Both files must already exist. The segment identifier is the index
    /// file's basename up to the first dot ("0001.index" → "0001").
    pub fn open(
        index_path: &Path,
        store_path: &Path,
        start_id: u64,
        config: &Config,
    ) -> Result<Self> {
        let index = Index::open(index_path, start_id, config.segment.max_index_size_bytes)?;
        let store = Store::open(store_path, config.segment.max_store_size_bytes)?;

        let id = index_path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .ok_or_else(|| {
                WalError::Corruption(format!("bad segment file name: {}", index_path.display()))
            })?
            .to_string();

        Ok(Self { id, index, store })
    }

    /// Append a payload, returning the assigned record id
    ///
    /// Store first: the payload must have a durable offset before the index
    /// points at it. If the store write lands but the index is full, the
    /// orphan frame stays behind unreachable; the log layer's rollover retry
    /// writes the payload afresh into the next segment.
    pub fn append(&mut self, payload: &[u8]) -> Result<u64> {
        let offset = self.store.write(payload)?;
        let id = self.index.write(offset)?;
        Ok(id)
    }

    /// Read the payload for a record id
    pub fn read(&mut self, id: u64) -> Result<Vec<u8>> {
        let offset = self.index.read(id)?;
        self.store.read(offset)
    }

    /// Flush both halves
    pub fn close(&mut self) -> Result<()> {
        self.index.close()?;
        self.store.close()?;
        Ok(())
    }

    /// Delete both files from disk
    pub fn remove(self) -> Result<()> {
        let Segment { index, store, .. } = self;
        index.remove()?;
        store.remove()?;
        Ok(())
    }

    /// Zero-padded segment identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of this segment's first record
    pub fn start_id(&self) -> u64 {
        self.index.start_id()
    }

    /// Id the next append to this segment would assign
    pub fn next_id(&self) -> u64 {
        self.index.next_id()
    }
}
