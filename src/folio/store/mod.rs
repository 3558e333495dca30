//! # Storage Layer
//!
//! Each content kind lives in one JSON array file under the data directory.
//! The file is never patched: every save loads the whole collection, changes
//! it in memory and writes the whole collection back.
//!
//! ## Load Tolerance
//!
//! - Missing file → empty collection.
//! - Zero-length or whitespace-only file → empty collection.
//! - Malformed JSON → handled by [`CorruptPolicy`]. The default keeps a copy
//!   of the unreadable file before starting over, so the next save cannot
//!   silently destroy the previous records.
//!
//! ## Identifiers
//!
//! [`next_id`] is `max(id) + 1`. Records deleted by hand from a catalog can
//! therefore never cause a new record to reuse an id that is still present.
//!
//! ## Writes
//!
//! Backends must replace the catalog atomically (temp file + rename), so a
//! failed write leaves the previous version in place.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: the production backend, one file per kind.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//! ├── photography.json
//! ├── chess.json
//! ├── anime.json
//! └── chess.corrupt-20240309-143000.json   # kept by the backup policy
//! ```

use crate::model::CatalogRecord;
use serde::{Deserialize, Serialize};

pub mod backend;
pub mod catalog;
pub mod fs_backend;
pub mod mem_backend;

pub use catalog::CatalogStore;

/// Where a new record goes in its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Newest first.
    #[default]
    Front,
    Back,
}

/// How `load` treats a catalog that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Copy the file aside, then continue with an empty collection.
    #[default]
    Backup,
    /// Continue with an empty collection; the next save discards the old file.
    Reset,
    /// Fail with `CorruptCatalog`.
    Refuse,
}

/// Next identifier for a collection: one past the largest id present.
pub fn next_id<R: CatalogRecord>(existing: &[R]) -> u64 {
    existing
        .iter()
        .filter_map(|record| record.id())
        .max()
        .unwrap_or(0)
        + 1
}

/// Insert a record and return the new collection.
pub fn append<R: CatalogRecord>(mut existing: Vec<R>, record: R, placement: Placement) -> Vec<R> {
    match placement {
        Placement::Front => existing.insert(0, record),
        Placement::Back => existing.push(record),
    }
    existing
}
