//! # Configuration
//!
//! Folio configuration is managed by [`confique`], which layers environment
//! variables over an optional `folio.toml` at the site root over compiled
//! defaults.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `asset_dir` | `FOLIO_ASSET_DIR` | `images` | Flat directory holding every copied asset |
//! | `data_dir` | `FOLIO_DATA_DIR` | `data` | Directory holding the catalog files |
//! | `accepted_extensions` | | `["jpg", "jpeg", "png", "webp", "gif"]` | Image types accepted for staging |
//! | `collision` | `FOLIO_COLLISION` | `suffix` | `suffix` or `overwrite` when an asset name is taken |
//! | `placement` | `FOLIO_PLACEMENT` | `front` | `front` (newest first) or `back` |
//! | `on_corrupt` | `FOLIO_ON_CORRUPT` | `backup` | `backup`, `reset` or `refuse` for unreadable catalogs |
//!
//! Both directories are relative to the site root; the asset directory name is
//! also the prefix of every URL written into a catalog.

use crate::error::{FolioError, Result};
use crate::stager::CollisionPolicy;
use crate::store::{CorruptPolicy, Placement};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "folio.toml";

fn default_accepted_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "webp", "gif"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Configuration for folio, stored in `folio.toml` at the site root.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    /// Directory (relative to the site root) that receives copied assets.
    #[config(default = "images", env = "FOLIO_ASSET_DIR")]
    pub asset_dir: String,

    /// Directory (relative to the site root) that holds the catalog files.
    #[config(default = "data", env = "FOLIO_DATA_DIR")]
    pub data_dir: String,

    /// Extensions accepted when staging an asset, without the leading dot.
    /// When absent, defaults to jpg, jpeg, png, webp and gif.
    pub accepted_extensions: Option<Vec<String>>,

    #[config(default = "suffix", env = "FOLIO_COLLISION")]
    pub collision: CollisionPolicy,

    #[config(default = "front", env = "FOLIO_PLACEMENT")]
    pub placement: Placement,

    #[config(default = "backup", env = "FOLIO_ON_CORRUPT")]
    pub on_corrupt: CorruptPolicy,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            asset_dir: "images".to_string(),
            data_dir: "data".to_string(),
            accepted_extensions: None,
            collision: CollisionPolicy::Suffix,
            placement: Placement::Front,
            on_corrupt: CorruptPolicy::Backup,
        }
    }
}

impl FolioConfig {
    /// Load config for a site root: environment first, then `folio.toml`.
    /// A missing file is not an error.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        FolioConfig::builder()
            .env()
            .file(root.as_ref().join(CONFIG_FILENAME))
            .load()
            .map_err(|e| FolioError::Config(e.to_string()))
    }

    /// Accepted extensions, lower-cased and without a leading dot.
    pub fn accepted_extensions(&self) -> Vec<String> {
        self.accepted_extensions
            .clone()
            .unwrap_or_else(default_accepted_extensions)
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }
}
