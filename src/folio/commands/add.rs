//! The save pipeline shared by every content kind.
//!
//! Steps run in order and stop at the first failure:
//!
//! 1. Validate the draft (required fields, ranges).
//! 2. Commit the staged asset: derive the name, resolve collisions, copy.
//! 3. Load the catalog, assign the next id, insert the record.
//! 4. Persist the catalog.
//!
//! The asset is copied before the catalog is read and written. If either step
//! fails the copy stays where it is and a warning naming it is logged.

use crate::commands::{CmdMessage, CmdResult, RecordView, SitePaths};
use crate::error::{FolioError, Result};
use crate::model::{CatalogRecord, Draft};
use crate::session::{SavePhase, Session};
use crate::stager::{self, CollisionPolicy};
use crate::store::backend::StorageBackend;
use crate::store::{append, next_id, CatalogStore, Placement};
use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    pub collision: CollisionPolicy,
    pub placement: Placement,
}

pub fn run<B: StorageBackend, D: Draft>(
    store: &CatalogStore<B>,
    paths: &SitePaths,
    options: AddOptions,
    session: &mut Session,
    draft: D,
    now: DateTime<Local>,
) -> Result<CmdResult> {
    let draft = draft.validated().map_err(|e| session.fail(e))?;

    if D::REQUIRES_ASSET && session.staged().is_none() {
        return Err(session.fail(FolioError::NothingStaged));
    }

    session.enter(SavePhase::Committing);
    let committed = match session.staged() {
        Some(staged) => {
            let kind = D::Record::KIND;
            let committed = stager::derive_destination_name(
                draft.title(),
                staged.extension(),
                kind.asset_prefix(),
            )
            .and_then(|name| {
                let chosen = stager::resolve_collision(&paths.asset_dir, &name, options.collision);
                let url =
                    stager::commit(staged, &paths.asset_dir, &paths.public_asset_dir, &chosen)?;
                Ok(Committed {
                    derived: name,
                    chosen,
                    url,
                })
            });
            Some(committed.map_err(|e| session.fail(e))?)
        }
        None => None,
    };
    let asset_url = committed
        .as_ref()
        .map(|c| c.url.clone())
        .unwrap_or_default();

    session.enter(SavePhase::Appending);
    let existing: Vec<D::Record> = match store.load() {
        Ok(existing) => existing,
        Err(e) => {
            warn_orphaned(paths, committed.as_ref());
            return Err(session.fail(e));
        }
    };
    let id = next_id(&existing);
    let record = draft.into_record(id, asset_url, now);
    let updated = append(existing, record.clone(), options.placement);
    let position = match options.placement {
        Placement::Front => 1,
        Placement::Back => updated.len(),
    };

    session.enter(SavePhase::Persisting);
    if let Err(e) = store.save(&updated) {
        warn_orphaned(paths, committed.as_ref());
        return Err(session.fail(e));
    }

    session.finish();

    let mut result =
        CmdResult::default().with_affected(vec![RecordView::from_record(&record, position)?]);
    result.add_message(CmdMessage::success(format!(
        "Added {} #{}: {}",
        D::Record::KIND.label(),
        id,
        record.title()
    )));
    if let Some(c) = committed {
        if c.chosen != c.derived {
            result.add_message(CmdMessage::warning(format!(
                "{} already exists, saved as {}",
                c.derived, c.chosen
            )));
        }
        result.add_message(CmdMessage::info(format!("Copied asset to {}", c.url)));
    }
    Ok(result)
}

struct Committed {
    derived: String,
    chosen: String,
    url: String,
}

fn warn_orphaned(paths: &SitePaths, committed: Option<&Committed>) {
    if let Some(c) = committed {
        tracing::warn!(
            asset = %paths.asset_dir.join(&c.chosen).display(),
            "asset copied but catalog not updated"
        );
    }
}
