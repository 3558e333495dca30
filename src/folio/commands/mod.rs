//! # Command Layer
//!
//! This module contains the **core business logic** of folio. Each command lives
//! in its own submodule and implements plain Rust functions over the store, the
//! stager and the session.
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal I/O**: no stdout, stderr or formatting
//! - **Argument parsing**: that's the CLI layer's job
//! - **Exit codes**: return `Result`, let the caller decide
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`]:
//! - `affected`: records written by the command
//! - `listed`: records to display
//! - `messages`: structured messages with levels (info, success, warning, error)
//!
//! ## Command Modules
//!
//! - [`add`]: the save pipeline (commit asset, append, persist)
//! - [`list`]: read a catalog
//! - [`init`]: create the data and asset directories
//! - [`doctor`]: report duplicate ids and dangling asset references

use crate::config::FolioConfig;
use crate::error::Result;
use crate::model::{CatalogRecord, ContentKind};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod add;
pub mod doctor;
pub mod init;
pub mod list;

/// Where a site keeps its catalogs and assets.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub asset_dir: PathBuf,
    /// Asset directory as written into record URLs, e.g. `images`.
    pub public_asset_dir: String,
}

impl SitePaths {
    pub fn from_config(root: &Path, config: &FolioConfig) -> Self {
        let public = config.asset_dir.trim_matches('/').replace('\\', "/");
        Self {
            root: root.to_path_buf(),
            data_dir: root.join(&config.data_dir),
            asset_dir: root.join(&config.asset_dir),
            public_asset_dir: public,
        }
    }

    /// Local file an asset URL points to.
    pub fn asset_path_for_url(&self, url: &str) -> PathBuf {
        let prefix = format!("{}/", self.public_asset_dir);
        match url.strip_prefix(&prefix) {
            Some(name) => self.asset_dir.join(name),
            None => self.root.join(url),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A record as seen by UI clients: the common fields plus the full JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub kind: ContentKind,
    /// 1-based position in the catalog.
    pub position: usize,
    pub id: Option<u64>,
    pub title: String,
    pub asset_url: String,
    pub date: Option<String>,
    pub record: serde_json::Value,
}

impl RecordView {
    pub fn from_record<R: CatalogRecord>(record: &R, position: usize) -> Result<Self> {
        Ok(Self {
            kind: R::KIND,
            position,
            id: record.id(),
            title: record.title().to_string(),
            asset_url: record.asset_url().to_string(),
            date: record.date().map(str::to_string),
            record: serde_json::to_value(record)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<RecordView>,
    pub listed: Vec<RecordView>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, records: Vec<RecordView>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed(mut self, records: Vec<RecordView>) -> Self {
        self.listed = records;
        self
    }
}
