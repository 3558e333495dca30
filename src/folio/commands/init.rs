use crate::commands::{CmdMessage, CmdResult, SitePaths};
use crate::error::Result;
use std::fs;

pub fn run(paths: &SitePaths) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for dir in [&paths.data_dir, &paths.asset_dir] {
        if dir.is_dir() {
            result.add_message(CmdMessage::info(format!("{} already exists", dir.display())));
        } else {
            fs::create_dir_all(dir)?;
            result.add_message(CmdMessage::success(format!("Created {}", dir.display())));
        }
    }
    Ok(result)
}
