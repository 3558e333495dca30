use crate::error::Result;
use crate::model::ContentKind;
use std::path::PathBuf;

/// Abstract interface for raw catalog I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while CatalogStore handles the "what" (decoding, recovery, ordering).
pub trait StorageBackend {
    /// Read the raw catalog bytes. They are not required to be UTF-8;
    /// decoding is the store's job so bad bytes count as a corrupt catalog.
    /// Returns Ok(None) if the catalog does not exist yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_catalog(&self, kind: ContentKind) -> Result<Option<Vec<u8>>>;

    /// Replace the catalog text.
    /// MUST be atomic (e.g. write to tmp then rename) so a failed write
    /// leaves the previous catalog intact. Fails with `WriteFailed`.
    fn write_catalog(&self, kind: ContentKind, content: &str) -> Result<()>;

    /// Keep a copy of an unreadable catalog next to it.
    /// Returns the location of the copy.
    fn backup_catalog(&self, kind: ContentKind, content: &[u8]) -> Result<PathBuf>;

    /// Location of the catalog. For MemBackend, a virtual path.
    fn catalog_path(&self, kind: ContentKind) -> PathBuf;
}
