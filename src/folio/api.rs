//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients (the CLI today, a desktop form tomorrow).
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** to the appropriate command function
//! - **Carries settings** from [`FolioConfig`] into each command
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## Sessions
//!
//! Form state lives in a [`Session`] owned by the caller. A client stages a
//! file with [`FolioApi::stage`] (or [`FolioApi::stage_drop`] for a drop
//! payload), then calls one of the `add_*` methods with the matching draft.
//! A failed add leaves the session staged so the same file can be retried.
//!
//! ## Generic Over StorageBackend
//!
//! - Production: `FolioApi<FsBackend>`, built by [`open_site`]
//! - Testing: `FolioApi<MemBackend>`
//!
//! ## Preconditions
//!
//! Only one process may write a given site at a time. Every save rewrites the
//! whole catalog, so two concurrent writers lose each other's records.

use crate::commands::{self, add::AddOptions, CmdMessage, CmdResult, SitePaths};
use crate::config::FolioConfig;
use crate::error::Result;
use crate::model::{
    AnimeDraft, AnimeEntry, ChessDraft, ChessPost, ContentKind, Draft, Photo, PhotoDraft,
};
use crate::session::Session;
use crate::stager;
use crate::store::backend::StorageBackend;
use crate::store::fs_backend::FsBackend;
use crate::store::CatalogStore;
use chrono::Local;
use std::path::Path;

pub struct FolioApi<B: StorageBackend> {
    store: CatalogStore<B>,
    paths: SitePaths,
    config: FolioConfig,
}

/// Open the site rooted at `root` with its `folio.toml` and environment.
pub fn open_site(root: &Path) -> Result<FolioApi<FsBackend>> {
    let config = FolioConfig::load(root)?;
    let paths = SitePaths::from_config(root, &config);
    let backend = FsBackend::new(paths.data_dir.clone());
    Ok(FolioApi::new(backend, paths, config))
}

impl<B: StorageBackend> FolioApi<B> {
    pub fn new(backend: B, paths: SitePaths, config: FolioConfig) -> Self {
        let store = CatalogStore::with_backend(backend).on_corrupt(config.on_corrupt);
        Self {
            store,
            paths,
            config,
        }
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn store(&self) -> &CatalogStore<B> {
        &self.store
    }

    pub fn stage<P: AsRef<Path>>(&self, session: &mut Session, path: P) -> Result<CmdResult> {
        let staged = session.stage(path, &self.config.accepted_extensions())?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!("Selected: {}", staged.file_name())));
        Ok(result)
    }

    pub fn stage_drop(&self, session: &mut Session, payload: &str) -> Result<CmdResult> {
        let staged = session.stage_drop(payload, &self.config.accepted_extensions())?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!("Selected: {}", staged.file_name())));
        Ok(result)
    }

    /// Title the photo form pre-fills from the staged file name.
    pub fn suggested_title(&self, session: &Session) -> Option<String> {
        session
            .staged()
            .map(|staged| stager::suggest_title(staged.source_path()))
    }

    pub fn add_photo(&self, session: &mut Session, draft: PhotoDraft) -> Result<CmdResult> {
        self.add(session, draft)
    }

    pub fn add_chess_post(&self, session: &mut Session, draft: ChessDraft) -> Result<CmdResult> {
        self.add(session, draft)
    }

    pub fn add_anime_entry(&self, session: &mut Session, draft: AnimeDraft) -> Result<CmdResult> {
        self.add(session, draft)
    }

    fn add<D: Draft>(&self, session: &mut Session, draft: D) -> Result<CmdResult> {
        let options = AddOptions {
            collision: self.config.collision,
            placement: self.config.placement,
        };
        commands::add::run(&self.store, &self.paths, options, session, draft, Local::now())
    }

    pub fn list(&self, kind: ContentKind) -> Result<CmdResult> {
        match kind {
            ContentKind::Photo => commands::list::run::<_, Photo>(&self.store),
            ContentKind::Chess => commands::list::run::<_, ChessPost>(&self.store),
            ContentKind::Anime => commands::list::run::<_, AnimeEntry>(&self.store),
        }
    }

    pub fn init(&self) -> Result<CmdResult> {
        commands::init::run(&self.paths)
    }

    pub fn doctor(&self) -> Result<CmdResult> {
        commands::doctor::run(&self.store, &self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::store::{CorruptPolicy, Placement};
    use std::fs;
    use tempfile::TempDir;

    fn api_with(config: FolioConfig, backend: MemBackend) -> (TempDir, FolioApi<MemBackend>) {
        let site = TempDir::new().unwrap();
        let paths = SitePaths::from_config(site.path(), &config);
        (site, FolioApi::new(backend, paths, config))
    }

    #[test]
    fn stage_reports_file_name() {
        let (site, api) = api_with(FolioConfig::default(), MemBackend::new());
        let path = site.path().join("pier.webp");
        fs::write(&path, "x").unwrap();

        let mut session = Session::new();
        let result = api.stage(&mut session, &path).unwrap();
        assert_eq!(result.messages[0].content, "Selected: pier.webp");
        assert_eq!(api.suggested_title(&session).as_deref(), Some("Pier"));
    }

    #[test]
    fn stage_honors_configured_extensions() {
        let config = FolioConfig {
            accepted_extensions: Some(vec!["png".to_string()]),
            ..Default::default()
        };
        let (site, api) = api_with(config, MemBackend::new());
        let path = site.path().join("pier.jpg");
        fs::write(&path, "x").unwrap();

        assert!(api.stage(&mut Session::new(), &path).is_err());
    }

    #[test]
    fn add_uses_configured_placement() {
        let config = FolioConfig {
            placement: Placement::Back,
            ..Default::default()
        };
        let (_site, api) = api_with(config, MemBackend::new());

        for title in ["Opening", "Middlegame"] {
            let draft = ChessDraft {
                title: title.into(),
                content: "notes".into(),
            };
            api.add_chess_post(&mut Session::new(), draft).unwrap();
        }

        let listed = api.list(ContentKind::Chess).unwrap().listed;
        assert_eq!(listed[0].title, "Opening");
        assert_eq!(listed[1].title, "Middlegame");
    }

    #[test]
    fn corrupt_policy_comes_from_config() {
        let config = FolioConfig {
            on_corrupt: CorruptPolicy::Refuse,
            ..Default::default()
        };
        let backend = MemBackend::new().with_raw(ContentKind::Chess, "nope");
        let (_site, api) = api_with(config, backend);

        assert!(api.list(ContentKind::Chess).is_err());
        let draft = ChessDraft {
            title: "Kept".into(),
            content: "safe".into(),
        };
        assert!(api.add_chess_post(&mut Session::new(), draft).is_err());
        assert_eq!(
            api.store().backend().raw(ContentKind::Chess).as_deref(),
            Some("nope")
        );
    }

    #[test]
    fn adds_through_a_shared_reference() {
        fn add_game(api: &FolioApi<MemBackend>, title: &str) -> Result<CmdResult> {
            let draft = ChessDraft {
                title: title.into(),
                content: "1.d4".into(),
            };
            api.add_chess_post(&mut Session::new(), draft)
        }

        let (_site, api) = api_with(FolioConfig::default(), MemBackend::new());
        let shared = &api;
        add_game(shared, "London").unwrap();
        add_game(shared, "Catalan").unwrap();

        assert_eq!(api.list(ContentKind::Chess).unwrap().listed.len(), 2);
    }
}
