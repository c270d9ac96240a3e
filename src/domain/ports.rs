use anyhow::Result;

/// Archive storage port: supplies raw archive bytes for an opaque storage key.
///
/// Implementations own transport and access concerns; the core only ever sees the bytes of a
/// completed build.
pub trait ArchiveSource: Send + Sync {
    fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}
