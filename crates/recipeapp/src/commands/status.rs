use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecipeStore;

pub fn run(store: &RecipeStore) -> Result<CmdResult> {
    let status = store.status()?;
    let mut result = CmdResult::default();
    if !status.writable {
        result.add_message(CmdMessage::warning(
            "No writable storage is available; changes cannot be saved",
        ));
    }
    if status.directory_grant_available {
        result.add_message(CmdMessage::info(
            "A directory can be chosen with --dir to store recipes there",
        ));
    }
    result.categories = store.categories();
    result.status = Some(status);
    Ok(result)
}
