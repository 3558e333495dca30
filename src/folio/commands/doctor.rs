//! Read-only consistency check across every catalog.
//!
//! Nothing is repaired: a duplicate id or a missing asset needs a human
//! decision, and the catalogs are the site's source of truth.

use crate::commands::{CmdMessage, CmdResult, SitePaths};
use crate::error::{FolioError, Result};
use crate::model::{AnimeEntry, CatalogRecord, ChessPost, Photo};
use crate::store::backend::StorageBackend;
use crate::store::CatalogStore;
use std::collections::HashSet;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DoctorReport {
    pub corrupt_catalogs: usize,
    pub duplicate_ids: usize,
    pub missing_ids: usize,
    pub missing_assets: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        *self == DoctorReport::default()
    }
}

pub fn run<B: StorageBackend>(store: &CatalogStore<B>, paths: &SitePaths) -> Result<CmdResult> {
    let mut report = DoctorReport::default();
    let mut result = CmdResult::default();

    check::<B, Photo>(store, paths, &mut report, &mut result)?;
    check::<B, ChessPost>(store, paths, &mut report, &mut result)?;
    check::<B, AnimeEntry>(store, paths, &mut report, &mut result)?;

    if report.is_clean() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    }
    Ok(result)
}

fn check<B: StorageBackend, R: CatalogRecord>(
    store: &CatalogStore<B>,
    paths: &SitePaths,
    report: &mut DoctorReport,
    result: &mut CmdResult,
) -> Result<()> {
    let records: Vec<R> = match store.load_strict() {
        Ok(records) => records,
        Err(e @ FolioError::CorruptCatalog { .. }) => {
            report.corrupt_catalogs += 1;
            result.add_message(CmdMessage::error(e.to_string()));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut seen = HashSet::new();
    for record in &records {
        match record.id() {
            Some(id) => {
                if !seen.insert(id) {
                    report.duplicate_ids += 1;
                    result.add_message(CmdMessage::warning(format!(
                        "{}: id {} is used more than once",
                        R::KIND,
                        id
                    )));
                }
            }
            None => {
                report.missing_ids += 1;
                result.add_message(CmdMessage::info(format!(
                    "{}: '{}' has no id",
                    R::KIND,
                    record.title()
                )));
            }
        }

        let url = record.asset_url();
        if !url.is_empty() && !paths.asset_path_for_url(url).is_file() {
            report.missing_assets += 1;
            result.add_message(CmdMessage::warning(format!(
                "{}: '{}' points to missing asset {}",
                R::KIND,
                record.title(),
                url
            )));
        }
    }
    Ok(())
}
