//! Mock implementations for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use docpack::domain::ports::ArchiveSource;

/// Mock ArchiveSource that serves archive bytes from an in-memory map and counts fetches.
pub struct MockArchiveSource {
    archives: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl MockArchiveSource {
    pub fn new() -> Self {
        Self {
            archives: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_archive(mut self, key: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.archives.insert(key.into(), bytes);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MockArchiveSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSource for MockArchiveSource {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.archives
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("Archive not found: {}", key))
    }
}
