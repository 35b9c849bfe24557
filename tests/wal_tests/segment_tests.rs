//! Tests for segments
//!
//! These tests verify:
//! - Identifier derivation from file names
//! - The store-then-index append protocol
//! - Space errors from either half
//! - Removal of both files

use std::fs::File;
use std::path::PathBuf;

use segwal::config::Config;
use segwal::error::WalError;
use segwal::segment::Segment;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_segment(stem: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let index_path = temp_dir.path().join(format!("{}.index", stem));
    let store_path = temp_dir.path().join(format!("{}.store", stem));
    File::create(&index_path).unwrap();
    File::create(&store_path).unwrap();
    (temp_dir, index_path, store_path)
}

fn small_config(store_bytes: u64, index_bytes: u64) -> Config {
    Config::builder()
        .max_store_size_bytes(store_bytes)
        .max_index_size_bytes(index_bytes)
        .build()
}

// =============================================================================
// Identifier Tests
// =============================================================================

#[test]
fn test_segment_id_from_index_basename() {
    let (_temp, index_path, store_path) = setup_temp_segment("0007");

    let segment = Segment::open(&index_path, &store_path, 1, &Config::default()).unwrap();
    assert_eq!(segment.id(), "0007");
    assert_eq!(segment.start_id(), 1);
    assert_eq!(segment.next_id(), 1);
}

// =============================================================================
// Append/Read Tests
// =============================================================================

#[test]
fn test_append_then_read() {
    let (_temp, index_path, store_path) = setup_temp_segment("0001");
    let mut segment = Segment::open(&index_path, &store_path, 1, &Config::default()).unwrap();

    let messages: Vec<&[u8]> = vec![b"hello", b"test", b"abc"];
    let mut ids = Vec::new();

    for message in &messages {
        ids.push(segment.append(message).unwrap());
    }

    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(segment.next_id(), 4);

    for (id, message) in ids.iter().zip(&messages) {
        assert_eq!(segment.read(*id).unwrap(), *message);
    }
}

#[test]
fn test_read_unknown_id() {
    let (_temp, index_path, store_path) = setup_temp_segment("0001");
    let mut segment = Segment::open(&index_path, &store_path, 1, &Config::default()).unwrap();
    segment.append(b"only").unwrap();

    assert!(matches!(segment.read(2), Err(WalError::RecordNotFound)));
}

// =============================================================================
// Space Error Tests
// =============================================================================

#[test]
fn test_full_store_reports_no_store_space() {
    let (_temp, index_path, store_path) = setup_temp_segment("0001");
    let mut segment =
        Segment::open(&index_path, &store_path, 1, &small_config(16, 1024)).unwrap();

    segment.append(b"12345678").unwrap();
    let result = segment.append(b"x");
    assert!(matches!(result, Err(WalError::NoStoreSpaceLeft)));
}

#[test]
fn test_full_index_reports_no_index_space() {
    let (_temp, index_path, store_path) = setup_temp_segment("0001");

    // One slot, roomy store: the second append reaches the store (leaving an
    // unreachable orphan frame) before the index refuses it
    let mut segment =
        Segment::open(&index_path, &store_path, 1, &small_config(1024, 16)).unwrap();

    segment.append(b"fits").unwrap();
    let result = segment.append(b"does not");
    assert!(matches!(result, Err(WalError::NoIndexSpaceLeft)));

    // The assigned record is still readable
    assert_eq!(segment.read(1).unwrap(), b"fits");
}

// =============================================================================
// Reopen Tests
// =============================================================================

#[test]
fn test_reopen_continues_ids() {
    let (_temp, index_path, store_path) = setup_temp_segment("0001");

    {
        let mut segment =
            Segment::open(&index_path, &store_path, 5, &Config::default()).unwrap();
        assert_eq!(segment.append(b"one").unwrap(), 5);
        assert_eq!(segment.append(b"two").unwrap(), 6);
        segment.close().unwrap();
    }

    let mut segment = Segment::open(&index_path, &store_path, 5, &Config::default()).unwrap();
    assert_eq!(segment.next_id(), 7);
    assert_eq!(segment.append(b"three").unwrap(), 7);
    assert_eq!(segment.read(5).unwrap(), b"one");
    assert_eq!(segment.read(6).unwrap(), b"two");
    assert_eq!(segment.read(7).unwrap(), b"three");
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_deletes_both_files() {
    let (_temp, index_path, store_path) = setup_temp_segment("0003");
    let mut segment = Segment::open(&index_path, &store_path, 1, &Config::default()).unwrap();
    segment.append(b"doomed").unwrap();

    segment.remove().unwrap();
    assert!(!index_path.exists());
    assert!(!store_path.exists());
}
