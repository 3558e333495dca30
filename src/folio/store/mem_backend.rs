use super::backend::StorageBackend;
use crate::error::{FolioError, Result};
use crate::model::ContentKind;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since folio is single-threaded.
/// This keeps the `StorageBackend` trait on `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    catalogs: RefCell<HashMap<ContentKind, Vec<u8>>>,
    backups: RefCell<Vec<(ContentKind, Vec<u8>)>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog with raw text, valid or not.
    pub fn with_raw(self, kind: ContentKind, raw: &str) -> Self {
        self.with_bytes(kind, raw.as_bytes())
    }

    /// Seed a catalog with arbitrary bytes, including invalid UTF-8.
    pub fn with_bytes(self, kind: ContentKind, bytes: &[u8]) -> Self {
        self.catalogs.borrow_mut().insert(kind, bytes.to_vec());
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    pub fn raw(&self, kind: ContentKind) -> Option<String> {
        self.catalogs
            .borrow()
            .get(&kind)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn backups(&self) -> Vec<(ContentKind, String)> {
        self.backups
            .borrow()
            .iter()
            .map(|(kind, bytes)| (*kind, String::from_utf8_lossy(bytes).into_owned()))
            .collect()
    }
}

impl StorageBackend for MemBackend {
    fn read_catalog(&self, kind: ContentKind) -> Result<Option<Vec<u8>>> {
        Ok(self.catalogs.borrow().get(&kind).cloned())
    }

    fn write_catalog(&self, kind: ContentKind, content: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(FolioError::WriteFailed {
                path: self.catalog_path(kind),
                source: io::Error::new(io::ErrorKind::Other, "Simulated write error"),
            });
        }
        self.catalogs
            .borrow_mut()
            .insert(kind, content.as_bytes().to_vec());
        Ok(())
    }

    fn backup_catalog(&self, kind: ContentKind, content: &[u8]) -> Result<PathBuf> {
        let mut backups = self.backups.borrow_mut();
        backups.push((kind, content.to_vec()));
        Ok(PathBuf::from(format!(
            "/mem/{}.corrupt-{}",
            kind.catalog_file(),
            backups.len()
        )))
    }

    fn catalog_path(&self, kind: ContentKind) -> PathBuf {
        PathBuf::from("/mem").join(kind.catalog_file())
    }
}
