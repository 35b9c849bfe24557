//! Configuration for segwal
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, WalError};
use crate::index::SLOT_SIZE;

/// Main configuration for a log instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-segment capacity limits
    pub segment: SegmentConfig,
}

/// Capacity limits for a single segment
#[derive(Debug, Clone, Copy)]
pub struct SegmentConfig {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Cap on a store file's logical bytes (frames, length prefixes included).
    /// Zero means "use default".
    pub max_store_size_bytes: u64,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Cap on an index file's bytes. Must be a non-zero multiple of 16.
    /// Zero means "use default".
    pub max_index_size_bytes: u64,
}

/// Default store file cap
pub const DEFAULT_MAX_STORE_SIZE_BYTES: u64 = 1024;

/// Default index file cap (64 slots)
pub const DEFAULT_MAX_INDEX_SIZE_BYTES: u64 = 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            segment: SegmentConfig {
                max_store_size_bytes: DEFAULT_MAX_STORE_SIZE_BYTES,
                max_index_size_bytes: DEFAULT_MAX_INDEX_SIZE_BYTES,
            },
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Replace zero-valued fields with their defaults.
    ///
    /// Zero is the "unset" marker so callers can fill in only the caps they
    /// care about.
    pub(crate) fn normalize(mut self) -> Self {
        if self.segment.max_store_size_bytes == 0 {
            self.segment.max_store_size_bytes = DEFAULT_MAX_STORE_SIZE_BYTES;
        }
        if self.segment.max_index_size_bytes == 0 {
            self.segment.max_index_size_bytes = DEFAULT_MAX_INDEX_SIZE_BYTES;
        }
        self
    }

    /// Validate a normalized config
    ///
    /// The index cap must hold a whole number of 16-byte slots.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.segment.max_index_size_bytes == 0
            || self.segment.max_index_size_bytes % SLOT_SIZE != 0
        {
            return Err(WalError::MaxIndexSize);
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file cap in bytes
    pub fn max_store_size_bytes(mut self, bytes: u64) -> Self {
        self.config.segment.max_store_size_bytes = bytes;
        self
    }

    /// Set the index file cap in bytes
    pub fn max_index_size_bytes(mut self, bytes: u64) -> Self {
        self.config.segment.max_index_size_bytes = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
