//! Log
//!
//! The public façade and segment lifecycle manager.
//!
//! ## Responsibilities
//! - Discover existing segments on startup and rebuild in-memory state
//! - Route appends to the active segment, rolling over when it fills
//! - Route reads to the segment whose id range covers the record
//! - Trim whole segments below a watermark
//!
//! ## Concurrency
//! One log-wide mutex serializes `append`, `read`, and `trim` for their full
//! duration, so segments, indexes, and stores only ever see single-threaded
//! access. Ids are assigned in lock-acquisition order.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, WalError};
use crate::segment::Segment;

/// A durable, append-only record log over a directory of segments
pub struct Log {
    inner: Mutex<LogInner>,
}

/// State behind the log-wide mutex
struct LogInner {
    /// Directory holding all segment files
    dir: PathBuf,

    /// Normalized configuration applied to every segment
    config: Config,

    /// Segments ordered by start id; the last one is active
    segments: Vec<Segment>,
}

impl Log {
    /// Open a log directory, recovering any existing segments
    ///
    /// Zero-valued config fields fall back to their defaults; an index cap
    /// that is not a non-zero multiple of 16 fails before any file is
    /// touched. Discovery:
    /// 1. Enumerate the directory and sort names ascending (zero-padded
    ///    names make lexicographic order numeric order).
    /// 2. Every `NNNN.store` file is paired with its `NNNN.index`; index
    ///    files without a store are ignored.
    /// 3. A segment's start id is read from the first slot of its index
    ///    file; an index with no written slots falls back to a running
    ///    counter (1 for the first segment, then the previous segment's
    ///    next id).
    /// 4. An empty directory is bootstrapped with an empty `0001` segment.
    pub fn open(dir: impl AsRef<Path>, config: Config) -> Result<Self> {
        let dir = dir.as_ref();
        let config = config.normalize();
        config.validate()?;

        fs::create_dir_all(dir)?;

        let mut stems: Vec<String> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            let stem = match name.strip_suffix(".store") {
                Some(stem) => stem,
                None => continue,
            };
            if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
                tracing::warn!("skipping unrecognized store file {}", name);
                continue;
            }
            stems.push(stem.to_string());
        }
        stems.sort();

        let mut segments = Vec::with_capacity(stems.len());
        let mut next_start = 1;

        for stem in &stems {
            let index_path = dir.join(format!("{}.index", stem));
            let store_path = dir.join(format!("{}.store", stem));

            let start_id = match read_slot_zero_id(&index_path)? {
                Some(id) => id,
                None => next_start,
            };

            let segment = Segment::open(&index_path, &store_path, start_id, &config)?;
            next_start = segment.next_id();
            segments.push(segment);
        }

        if segments.is_empty() {
            segments.push(create_segment(dir, "0001", 1, &config)?);
        }

        tracing::debug!(
            "opened log at {} with {} segment(s)",
            dir.display(),
            segments.len()
        );

        Ok(Self {
            inner: Mutex::new(LogInner {
                dir: dir.to_path_buf(),
                config,
                segments,
            }),
        })
    }

    /// Append a payload, returning its assigned record id
    ///
    /// When the active segment reports itself full (store or index), a new
    /// segment is created starting at the id the full one would have
    /// assigned next, and the write is retried exactly once. A second space
    /// failure means the payload alone exceeds the store cap and is returned
    /// to the caller.
    pub fn append(&self, payload: &[u8]) -> Result<u64> {
        let mut inner = self.inner.lock();

        let first_try = inner.active().append(payload);
        match first_try {
            Err(WalError::NoStoreSpaceLeft) | Err(WalError::NoIndexSpaceLeft) => {
                inner.roll_over()?;
                inner.active().append(payload)
            }
            result => result,
        }
    }

    /// Read the payload of a record by id
    pub fn read(&self, id: u64) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock();

        if id < inner.segments[0].start_id() {
            return Err(WalError::RecordNotFound);
        }

        // Every non-active segment covers [its start, next segment's start)
        for i in 0..inner.segments.len() - 1 {
            if inner.segments[i].start_id() <= id && id < inner.segments[i + 1].start_id() {
                return inner.segments[i].read(id);
            }
        }

        inner.active().read(id)
    }

    /// Remove whole segments whose id range lies at or below the watermark
    ///
    /// A non-active segment is dropped when the following segment starts at
    /// or below the watermark (its whole range is covered). The active
    /// segment survives even if its range is entirely below the watermark.
    pub fn trim(&self, watermark: u64) -> Result<()> {
        let mut inner = self.inner.lock();

        while inner.segments.len() > 1 && inner.segments[1].start_id() <= watermark {
            let segment = inner.segments.remove(0);
            tracing::debug!("trimming segment {}", segment.id());
            segment.remove()?;
        }

        Ok(())
    }

    /// Close the log, flushing every segment
    pub fn close(self) -> Result<()> {
        let mut inner = self.inner.into_inner();
        for segment in inner.segments.iter_mut() {
            segment.close()?;
        }
        Ok(())
    }

    /// Identifier of the segment currently receiving appends
    pub fn active_segment_id(&self) -> String {
        let inner = self.inner.lock();
        inner.segments[inner.segments.len() - 1].id().to_string()
    }

    /// Number of live segments
    pub fn segment_count(&self) -> usize {
        self.inner.lock().segments.len()
    }
}

impl LogInner {
    /// The segment currently receiving appends (always the last)
    fn active(&mut self) -> &mut Segment {
        self.segments
            .last_mut()
            .expect("log always holds at least one segment")
    }

    /// Create the next segment and make it active
    fn roll_over(&mut self) -> Result<()> {
        let active = self.active();
        let next_id = next_segment_id(active.id());
        let start_id = active.next_id();

        let segment = create_segment(&self.dir, &next_id, start_id, &self.config)?;
        tracing::debug!("rolled over to segment {} at id {}", next_id, start_id);
        self.segments.push(segment);

        Ok(())
    }
}

/// Create both files for a fresh segment and open it
fn create_segment(dir: &Path, stem: &str, start_id: u64, config: &Config) -> Result<Segment> {
    let index_path = dir.join(format!("{}.index", stem));
    let store_path = dir.join(format!("{}.store", stem));

    drop(File::create(&index_path)?);
    drop(File::create(&store_path)?);

    Segment::open(&index_path, &store_path, start_id, config)
}

/// Read the id stored in slot 0 of an index file, if any slot was written
///
/// A fresh bootstrap index is zero-length and a rolled-over index that never
/// received its first record is all zeros; both report `None` and the caller
/// falls back to its running start-id counter.
fn read_slot_zero_id(index_path: &Path) -> Result<Option<u64>> {
    if fs::metadata(index_path)?.len() < 8 {
        return Ok(None);
    }

    let mut file = File::open(index_path)?;
    let mut first = [0u8; 8];
    file.read_exact(&mut first)?;

    let id = u64::from_be_bytes(first);
    Ok(if id == 0 { None } else { Some(id) })
}

/// Numerically increment a zero-padded segment identifier
///
/// The result is left-padded back to four digits; identifiers keep growing
/// past "9999" without wrapping.
fn next_segment_id(current: &str) -> String {
    let n: u64 = current
        .parse()
        .expect("segment ids are numeric by construction");
    format!("{:04}", n + 1)
}
