//! Index file
//!
//! Constant-time record-id → store-offset lookup for one segment, backed by
//! a fixed-size memory-mapped file.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Slot 0:  [ id (8, BE) ][ offset (8, BE) ]    │  <- start_id lives here
//! │ Slot 1:  [ id (8, BE) ][ offset (8, BE) ]    │
//! │ ...                                          │
//! │ Slot N:  [ 0u64       ][ 0u64         ]      │  <- unused-slot sentinel
//! │ ...zeros to max_index_size_bytes...          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The file is pre-truncated to its full cap on open, so new files are
//! sparse zeros and reopened files keep their contents. Recovery is a scan
//! for the first all-zero slot; this sentinel works because record ids
//! start at 1.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::error::{Result, WalError};

/// Bytes per index slot: 8-byte id + 8-byte offset
pub const SLOT_SIZE: u64 = 16;

/// Memory-mapped id → offset table for one segment
pub struct Index {
    /// Writable mapping over the whole file
    mmap: MmapMut,

    /// Path, kept for removal
    path: PathBuf,

    /// Used bytes: slots written so far × 16
    size: u64,

    /// File size and cap on used bytes
    max_size: u64,

    /// Id of the record in slot 0
    start_id: u64,

    /// Id the next write will assign
    next_id: u64,
}

impl Index {
    /// Open an existing index file
    ///
    /// The file must already exist; the log layer creates segment files
    /// before opening them. Steps:
    /// 1. Reject caps that are zero or not a multiple of 16.
    /// 2. Truncate the file to exactly `max_size` (zero-fills new files,
    ///    keeps contents when reopening).
    /// 3. Map the full range read/write.
    /// 4. Scan slots from the front until the first `(0, 0)` sentinel to
    ///    recover how many records this segment already holds.
    pub fn open(path: &Path, start_id: u64, max_size: u64) -> Result<Self> {
        if max_size == 0 || max_size % SLOT_SIZE != 0 {
            return Err(WalError::MaxIndexSize);
        }

        fs::metadata(path)?;

        let file = OpenOptions::new().read(true).write(true).open(path)?;
        file.set_len(max_size)?;

        let mmap = unsafe { MmapMut::map_mut(&file)? };

        let mut index = Self {
            mmap,
            path: path.to_path_buf(),
            size: 0,
            max_size,
            start_id,
            next_id: start_id,
        };

        let mut count = 0;
        while count * SLOT_SIZE < max_size {
            let (id, offset) = index.slot(count);
            if id == 0 && offset == 0 {
                break;
            }
            count += 1;
        }

        index.size = count * SLOT_SIZE;
        index.next_id = start_id + count;

        Ok(index)
    }

    /// Record a store offset under the next id, returning the assigned id
    ///
    /// Fails with `NoIndexSpaceLeft` once every slot is used. The mapping is
    /// flushed before this returns, so a returned id means the entry is
    /// durable.
    pub fn write(&mut self, offset: u64) -> Result<u64> {
        let slot = self.next_id - self.start_id;
        if slot * SLOT_SIZE >= self.max_size {
            return Err(WalError::NoIndexSpaceLeft);
        }

        let at = (slot * SLOT_SIZE) as usize;
        self.mmap[at..at + 8].copy_from_slice(&self.next_id.to_be_bytes());
        self.mmap[at + 8..at + 16].copy_from_slice(&offset.to_be_bytes());
        self.mmap.flush()?;

        self.size += SLOT_SIZE;
        let id = self.next_id;
        self.next_id += 1;

        Ok(id)
    }

    /// Look up the store offset for a record id
    ///
    /// Returns `RecordNotFound` for id 0 (never assigned), ids below this
    /// segment, or ids past the used slots.
    ///
    /// Panics if the slot holds a different id than requested: slot position
    /// and id are redundant by construction, so a mismatch means the file or
    /// the mapping is corrupt and any answer would be wrong data.
    pub fn read(&self, id: u64) -> Result<u64> {
        if id == 0 || id < self.start_id {
            return Err(WalError::RecordNotFound);
        }

        let slot = id - self.start_id;
        if slot * SLOT_SIZE >= self.size {
            return Err(WalError::RecordNotFound);
        }

        let (stored_id, offset) = self.slot(slot);
        assert_eq!(
            stored_id, id,
            "index slot {} of {} holds id {} instead of {}",
            slot,
            self.path.display(),
            stored_id,
            id
        );

        Ok(offset)
    }

    /// Flush the mapping to disk
    pub fn close(&mut self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }

    /// Delete the index file from disk
    ///
    /// The mapping is dropped before the unlink.
    pub fn remove(self) -> Result<()> {
        let Index { mmap, path, .. } = self;
        drop(mmap);
        fs::remove_file(path)?;
        Ok(())
    }

    /// Id of this segment's first record
    pub fn start_id(&self) -> u64 {
        self.start_id
    }

    /// Id the next write will assign
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Used bytes (written slots × 16)
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Decode the (id, offset) pair in the given slot
    fn slot(&self, slot: u64) -> (u64, u64) {
        let at = (slot * SLOT_SIZE) as usize;
        let id = u64::from_be_bytes(self.mmap[at..at + 8].try_into().unwrap());
        let offset = u64::from_be_bytes(self.mmap[at + 8..at + 16].try_into().unwrap());
        (id, offset)
    }
}
