use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecipeStore;

/// Write the current set through to the active backend again.
pub fn run(store: &RecipeStore) -> Result<CmdResult> {
    let count = store.write_now()?;
    let status = store.status()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Wrote {} recipes to {}",
        count,
        status.location.as_deref().unwrap_or("the active backend")
    )));
    Ok(result)
}
