//! # segwal
//!
//! An embeddable, segmented write-ahead log:
//! - Append-only records with stable, monotonically increasing ids
//! - Every append fsynced before its id is returned
//! - Random read-by-id across segment boundaries
//! - Crash recovery by directory scan, no separate manifest
//! - Whole-segment prefix trimming
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Log                                 │
//! │     (segment discovery, rollover, trim, log-wide mutex)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Segment                                │
//! │          (one NNNN.index + NNNN.store file pair)             │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!     ┌─────────────┐               ┌─────────────┐
//!     │    Index    │               │    Store    │
//!     │ (mmap, id → │               │ (append-only│
//!     │   offset)   │               │   frames)   │
//!     └─────────────┘               └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use segwal::{Config, Log};
//!
//! # fn main() -> segwal::Result<()> {
//! let log = Log::open("./wal", Config::default())?;
//! let id = log.append(b"hello")?;
//! assert_eq!(log.read(id)?, b"hello");
//! log.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod index;
pub mod segment;
pub mod log;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, WalError};
pub use config::Config;
pub use log::Log;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of segwal
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
