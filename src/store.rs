//! Store file
//!
//! Durable, length-prefixed byte storage for one segment.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Frame 1                                 │
//! │ ┌──────────────┬──────────────────────┐ │
//! │ │ Len (8, BE)  │ Payload (Len bytes)  │ │
//! │ └──────────────┴──────────────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Frame 2                                 │
//! │ ┌──────────────┬──────────────────────┐ │
//! │ │ Len (8, BE)  │ Payload (Len bytes)  │ │
//! │ └──────────────┴──────────────────────┘ │
//! └─────────────────────────────────────────┘
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, WalError};

/// Bytes of length prefix in front of every payload
pub const FRAME_HEADER_SIZE: u64 = 8;

/// Append-only store file for one segment
pub struct Store {
    /// Open file handle (read + append)
    file: File,

    /// Path, kept for removal
    path: PathBuf,

    /// Logical size: sum of all frames written so far
    size: u64,

    /// Cap on the logical size
    max_size: u64,
}

impl Store {
    /// Open an existing store file
    ///
    /// The file must already exist; the log layer creates segment files
    /// before opening them. The logical size is the current file length.
    pub fn open(path: &Path, max_size: u64) -> Result<Self> {
        let size = fs::metadata(path)?.len();

        let file = OpenOptions::new().read(true).append(true).open(path)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            size,
            max_size,
        })
    }

    /// Append a payload, returning the offset of its frame
    ///
    /// Refuses with `NoStoreSpaceLeft` when the frame would push the logical
    /// size past the cap. The frame is fsynced before this returns, so a
    /// returned offset means the bytes are durable.
    pub fn write(&mut self, payload: &[u8]) -> Result<u64> {
        let frame_len = FRAME_HEADER_SIZE + payload.len() as u64;
        if self.size + frame_len > self.max_size {
            return Err(WalError::NoStoreSpaceLeft);
        }

        // Build the frame in one buffer so a single write_all covers it
        let mut frame = Vec::with_capacity(frame_len as usize);
        frame.extend_from_slice(&(payload.len() as u64).to_be_bytes());
        frame.extend_from_slice(payload);

        self.file.write_all(&frame)?;
        self.file.sync_all()?;

        let offset = self.size;
        self.size += frame_len;

        Ok(offset)
    }

    /// Read the payload of the frame at the given offset
    ///
    /// Reads the 8-byte length prefix, then that many payload bytes. Offsets
    /// come from the index, which is trusted; there is no bounds check
    /// against the logical size.
    pub fn read(&mut self, offset: u64) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset))?;

        let mut header = [0u8; FRAME_HEADER_SIZE as usize];
        self.file.read_exact(&mut header)?;
        let len = u64::from_be_bytes(header);

        let mut payload = vec![0u8; len as usize];
        self.file.read_exact(&mut payload)?;

        Ok(payload)
    }

    /// Flush file state to disk
    ///
    /// Appends already sync per write; this covers metadata on shutdown.
    pub fn close(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Delete the store file from disk
    pub fn remove(self) -> Result<()> {
        let Store { file, path, .. } = self;
        drop(file);
        fs::remove_file(path)?;
        Ok(())
    }

    /// Current logical size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}
