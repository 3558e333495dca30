use super::backend::StorageBackend;
use crate::error::{FolioError, Result};
use crate::model::ContentKind;
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsBackend {
    data_dir: PathBuf,
}

impl FsBackend {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ensure_dir(&self) -> io::Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_catalog(&self, kind: ContentKind) -> Result<Option<Vec<u8>>> {
        let path = self.catalog_path(kind);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read(path).map_err(FolioError::Io)?;
        Ok(Some(content))
    }

    fn write_catalog(&self, kind: ContentKind, content: &str) -> Result<()> {
        let path = self.catalog_path(kind);
        let write_failed = |source| FolioError::WriteFailed {
            path: path.clone(),
            source,
        };

        self.ensure_dir().map_err(write_failed)?;

        // Atomic write: the tmp file lives in the same directory so rename
        // never crosses a filesystem.
        let tmp_path = self.data_dir.join(format!(".{}-{}.tmp", kind, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, content) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_failed(e));
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_failed(e));
        }

        Ok(())
    }

    fn backup_catalog(&self, kind: ContentKind, content: &[u8]) -> Result<PathBuf> {
        self.ensure_dir().map_err(FolioError::Io)?;

        let stem = kind.catalog_file().trim_end_matches(".json");
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let mut backup = self.data_dir.join(format!("{}.corrupt-{}.json", stem, stamp));
        if backup.exists() {
            backup = self.data_dir.join(format!(
                "{}.corrupt-{}-{}.json",
                stem,
                stamp,
                Uuid::new_v4().simple()
            ));
        }

        fs::write(&backup, content).map_err(FolioError::Io)?;
        Ok(backup)
    }

    fn catalog_path(&self, kind: ContentKind) -> PathBuf {
        self.data_dir.join(kind.catalog_file())
    }
}
