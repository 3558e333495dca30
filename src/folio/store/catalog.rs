use super::backend::StorageBackend;
use super::CorruptPolicy;
use crate::error::{FolioError, Result};
use crate::model::{CatalogRecord, ContentKind};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
enum Recovery {
    KeepCopy,
    ReadOnly,
}

pub struct CatalogStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    on_corrupt: CorruptPolicy,
}

impl<B: StorageBackend> CatalogStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            on_corrupt: CorruptPolicy::default(),
        }
    }

    pub fn on_corrupt(mut self, policy: CorruptPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn catalog_path(&self, kind: ContentKind) -> PathBuf {
        self.backend.catalog_path(kind)
    }

    /// Load a catalog, recovering from malformed JSON per the corrupt policy.
    /// Used on the save path: under `Backup` the unreadable file is copied
    /// aside before the next save replaces it.
    pub fn load<R: CatalogRecord>(&self) -> Result<Vec<R>> {
        self.load_with(Recovery::KeepCopy)
    }

    /// Like [`load`](Self::load) but never writes. A corrupt catalog is
    /// reported and read as empty (or refused under `Refuse`); nothing is
    /// backed up since nothing is about to overwrite it.
    pub fn load_read_only<R: CatalogRecord>(&self) -> Result<Vec<R>> {
        self.load_with(Recovery::ReadOnly)
    }

    /// Load a catalog, failing with `CorruptCatalog` whatever the policy.
    /// Never writes anything.
    pub fn load_strict<R: CatalogRecord>(&self) -> Result<Vec<R>> {
        let Some(raw) = self.read_non_empty(R::KIND)? else {
            return Ok(Vec::new());
        };

        serde_json::from_slice(&raw).map_err(|source| FolioError::CorruptCatalog {
            path: self.backend.catalog_path(R::KIND),
            source,
        })
    }

    fn load_with<R: CatalogRecord>(&self, recovery: Recovery) -> Result<Vec<R>> {
        let Some(raw) = self.read_non_empty(R::KIND)? else {
            return Ok(Vec::new());
        };

        // from_slice rejects invalid UTF-8 with a syntax error, so bad bytes
        // take the same recovery path as bad JSON.
        match serde_json::from_slice(&raw) {
            Ok(records) => Ok(records),
            Err(source) => {
                self.recover(R::KIND, &raw, source, recovery)?;
                Ok(Vec::new())
            }
        }
    }

    fn read_non_empty(&self, kind: ContentKind) -> Result<Option<Vec<u8>>> {
        match self.backend.read_catalog(kind)? {
            None => {
                tracing::debug!(%kind, "no catalog yet");
                Ok(None)
            }
            Some(raw) if raw.iter().all(u8::is_ascii_whitespace) => {
                tracing::debug!(%kind, "empty catalog");
                Ok(None)
            }
            Some(raw) => Ok(Some(raw)),
        }
    }

    fn recover(
        &self,
        kind: ContentKind,
        raw: &[u8],
        source: serde_json::Error,
        recovery: Recovery,
    ) -> Result<()> {
        let path = self.backend.catalog_path(kind);
        match (self.on_corrupt, recovery) {
            (CorruptPolicy::Refuse, _) => Err(FolioError::CorruptCatalog { path, source }),
            (CorruptPolicy::Backup, Recovery::KeepCopy) => {
                let kept = self.backend.backup_catalog(kind, raw)?;
                tracing::warn!(
                    catalog = %path.display(),
                    backup = %kept.display(),
                    error = %source,
                    "catalog is not valid JSON, kept a copy and starting from an empty collection"
                );
                Ok(())
            }
            (CorruptPolicy::Backup, Recovery::ReadOnly) => {
                tracing::warn!(
                    catalog = %path.display(),
                    error = %source,
                    "catalog is not valid JSON, reading it as empty"
                );
                Ok(())
            }
            (CorruptPolicy::Reset, _) => {
                tracing::warn!(
                    catalog = %path.display(),
                    error = %source,
                    "catalog is not valid JSON, starting from an empty collection"
                );
                Ok(())
            }
        }
    }

    /// Persist the full collection, replacing the previous catalog.
    pub fn save<R: CatalogRecord>(&self, records: &[R]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        self.backend.write_catalog(R::KIND, &content)?;
        tracing::info!(kind = %R::KIND, records = records.len(), "catalog saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChessPost, Photo};
    use crate::store::mem_backend::MemBackend;
    use crate::store::{append, next_id, Placement};

    fn photo(id: u64, title: &str) -> Photo {
        Photo {
            id,
            url: format!("images/{}.jpg", title.to_lowercase()),
            title: title.into(),
            location: "Lisbon".into(),
            description: "Tiles".into(),
            date_added: "2024-05-01".into(),
            extra: Default::default(),
        }
    }

    #[test]
    fn missing_catalog_loads_empty() {
        let store = CatalogStore::with_backend(MemBackend::new());
        assert!(store.load::<Photo>().unwrap().is_empty());
    }

    #[test]
    fn blank_catalog_loads_empty() {
        let backend = MemBackend::new().with_raw(ContentKind::Photo, "  \n");
        let store = CatalogStore::with_backend(backend);
        assert!(store.load::<Photo>().unwrap().is_empty());
    }

    #[test]
    fn corrupt_catalog_is_backed_up_by_default() {
        let backend = MemBackend::new().with_raw(ContentKind::Chess, "[{\"id\": 1,");
        let store = CatalogStore::with_backend(backend);

        assert!(store.load::<ChessPost>().unwrap().is_empty());
        let backups = store.backend().backups();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0], (ContentKind::Chess, "[{\"id\": 1,".to_string()));
    }

    #[test]
    fn corrupt_catalog_reset_keeps_nothing() {
        let backend = MemBackend::new().with_raw(ContentKind::Photo, "not json");
        let store = CatalogStore::with_backend(backend).on_corrupt(CorruptPolicy::Reset);

        assert!(store.load::<Photo>().unwrap().is_empty());
        assert!(store.backend().backups().is_empty());
    }

    #[test]
    fn corrupt_catalog_refused() {
        let backend = MemBackend::new().with_raw(ContentKind::Photo, "{oops");
        let store = CatalogStore::with_backend(backend).on_corrupt(CorruptPolicy::Refuse);

        assert!(matches!(
            store.load::<Photo>(),
            Err(FolioError::CorruptCatalog { .. })
        ));
    }

    #[test]
    fn load_strict_ignores_policy() {
        let backend = MemBackend::new().with_raw(ContentKind::Photo, "{oops");
        let store = CatalogStore::with_backend(backend);

        assert!(store.load_strict::<Photo>().is_err());
        assert!(store.backend().backups().is_empty());
    }

    #[test]
    fn wrong_shape_counts_as_corrupt() {
        let backend = MemBackend::new().with_raw(ContentKind::Photo, "{\"id\": 1}");
        let store = CatalogStore::with_backend(backend).on_corrupt(CorruptPolicy::Refuse);
        assert!(store.load::<Photo>().is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = CatalogStore::with_backend(MemBackend::new());
        let records = vec![photo(2, "Alfama"), photo(1, "Belem")];

        store.save(&records).unwrap();
        let loaded: Vec<Photo> = store.load().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn save_is_pretty_printed() {
        let store = CatalogStore::with_backend(MemBackend::new());
        store.save(&[photo(1, "Alfama")]).unwrap();

        let raw = store.backend().raw(ContentKind::Photo).unwrap();
        assert!(raw.starts_with("[\n"));
        assert!(raw.contains("\"date_added\": \"2024-05-01\""));
    }

    #[test]
    fn failed_write_surfaces_and_keeps_previous_catalog() {
        let store = CatalogStore::with_backend(MemBackend::new());
        store.save(&[photo(1, "Alfama")]).unwrap();

        store.backend().set_simulate_write_error(true);
        let existing: Vec<Photo> = store.load().unwrap();
        let id = next_id(&existing);
        let updated = append(existing, photo(id, "Belem"), Placement::Front);
        assert!(matches!(
            store.save(&updated),
            Err(FolioError::WriteFailed { .. })
        ));

        store.backend().set_simulate_write_error(false);
        let after: Vec<Photo> = store.load().unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].title, "Alfama");
    }

    #[test]
    fn invalid_utf8_is_treated_as_corrupt() {
        let backend = MemBackend::new().with_bytes(ContentKind::Photo, b"[\xff\xfe");
        let store = CatalogStore::with_backend(backend);

        assert!(store.load::<Photo>().unwrap().is_empty());
        assert_eq!(store.backend().backups().len(), 1);
    }

    #[test]
    fn invalid_utf8_refused_as_corrupt_catalog() {
        let backend = MemBackend::new().with_bytes(ContentKind::Photo, b"[\xff\xfe");
        let store = CatalogStore::with_backend(backend).on_corrupt(CorruptPolicy::Refuse);

        assert!(matches!(
            store.load::<Photo>(),
            Err(FolioError::CorruptCatalog { .. })
        ));
    }

    #[test]
    fn read_only_load_never_backs_up() {
        let backend = MemBackend::new().with_raw(ContentKind::Chess, "[{");
        let store = CatalogStore::with_backend(backend);

        for _ in 0..3 {
            assert!(store.load_read_only::<ChessPost>().unwrap().is_empty());
        }
        assert!(store.backend().backups().is_empty());
        assert_eq!(store.backend().raw(ContentKind::Chess).as_deref(), Some("[{"));
    }

    #[test]
    fn read_only_load_still_honors_refuse() {
        let backend = MemBackend::new().with_raw(ContentKind::Chess, "[{");
        let store = CatalogStore::with_backend(backend).on_corrupt(CorruptPolicy::Refuse);
        assert!(store.load_read_only::<ChessPost>().is_err());
    }

    #[test]
    fn unknown_keys_are_written_back_unchanged() {
        let seeded = r#"[
  {
    "id": 1,
    "url": "images/a.jpg",
    "title": "A",
    "location": "",
    "description": "",
    "date_added": "2024-01-01",
    "camera": "X100V",
    "featured": true
  }
]"#;
        let backend = MemBackend::new().with_raw(ContentKind::Photo, seeded);
        let store = CatalogStore::with_backend(backend);

        let existing: Vec<Photo> = store.load().unwrap();
        store.save(&existing).unwrap();
        assert_eq!(store.backend().raw(ContentKind::Photo).as_deref(), Some(seeded));

        let id = next_id(&existing);
        let updated = append(existing, photo(id, "Belem"), Placement::Front);
        store.save(&updated).unwrap();

        let raw = store.backend().raw(ContentKind::Photo).unwrap();
        let values: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(values[1]["camera"], "X100V");
        assert_eq!(values[1]["featured"], true);
        assert!(values[0].get("camera").is_none());
    }
}
