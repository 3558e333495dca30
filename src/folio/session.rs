//! # Editing Session
//!
//! A [`Session`] is the state of one form: the asset staged so far and where
//! the last save got to. UI clients own one session per open form and hand it
//! to the API on every call, so staging and saving never depend on any widget.
//!
//! A save walks through these phases:
//!
//! ```text
//! Idle → Validating → Staged → Committing → Appending → Persisting → Done
//!              └───────────┴──────────┴───────────┴──→ Failed(reason)
//! ```
//!
//! A failure keeps the staged asset so the operator can fix the form and try
//! again. Reaching `Done` clears it.

use crate::error::{FolioError, Result};
use crate::stager::{self, StagedAsset};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SavePhase {
    #[default]
    Idle,
    Validating,
    Staged,
    Committing,
    Appending,
    Persisting,
    Done,
    Failed(String),
}

impl fmt::Display for SavePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavePhase::Idle => f.write_str("idle"),
            SavePhase::Validating => f.write_str("validating"),
            SavePhase::Staged => f.write_str("staged"),
            SavePhase::Committing => f.write_str("committing"),
            SavePhase::Appending => f.write_str("appending"),
            SavePhase::Persisting => f.write_str("persisting"),
            SavePhase::Done => f.write_str("done"),
            SavePhase::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    staged: Option<StagedAsset>,
    phase: SavePhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> Option<&StagedAsset> {
        self.staged.as_ref()
    }

    pub fn phase(&self) -> &SavePhase {
        &self.phase
    }

    /// Validate and stage a picked file. On failure the previous asset, if
    /// any, stays staged.
    pub fn stage<P: AsRef<Path>>(&mut self, path: P, accepted: &[String]) -> Result<&StagedAsset> {
        self.phase = SavePhase::Validating;
        match stager::validate(path, accepted) {
            Ok(staged) => {
                self.phase = SavePhase::Staged;
                Ok(self.staged.insert(staged))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Stage the first file of a drop payload.
    pub fn stage_drop(&mut self, payload: &str, accepted: &[String]) -> Result<&StagedAsset> {
        match stager::parse_drop_payload(payload).into_iter().next() {
            Some(path) => self.stage(path, accepted),
            None => Err(self.fail(FolioError::NotFound(payload.trim().into()))),
        }
    }

    /// Forget the staged asset and return to `Idle`.
    pub fn reset(&mut self) {
        self.staged = None;
        self.phase = SavePhase::Idle;
    }

    pub(crate) fn enter(&mut self, phase: SavePhase) {
        tracing::debug!(%phase, "save phase");
        self.phase = phase;
    }

    /// Record a failure and hand the error back for propagation.
    pub(crate) fn fail(&mut self, err: FolioError) -> FolioError {
        self.phase = SavePhase::Failed(err.to_string());
        err
    }

    pub(crate) fn finish(&mut self) {
        self.staged = None;
        self.phase = SavePhase::Done;
    }
}
