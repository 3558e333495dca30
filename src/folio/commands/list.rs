use crate::commands::{CmdMessage, CmdResult, RecordView};
use crate::error::Result;
use crate::model::CatalogRecord;
use crate::store::backend::StorageBackend;
use crate::store::CatalogStore;

/// Listing never writes, so a corrupt catalog is read without taking a backup.
pub fn run<B: StorageBackend, R: CatalogRecord>(store: &CatalogStore<B>) -> Result<CmdResult> {
    let records: Vec<R> = store.load_read_only()?;
    let listed = records
        .iter()
        .enumerate()
        .map(|(i, record)| RecordView::from_record(record, i + 1))
        .collect::<Result<Vec<_>>>()?;

    let mut result = CmdResult::default().with_listed(listed);
    if result.listed.is_empty() {
        result.add_message(CmdMessage::info(format!("No {} entries yet.", R::KIND)));
    }
    Ok(result)
}
