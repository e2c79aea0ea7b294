use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RecipeError, Result};
use crate::store::RecipeStore;
use std::fs;
use std::path::Path;

/// Replace the whole set with the records in an interchange file.
pub fn run(store: &RecipeStore, path: &Path) -> Result<CmdResult> {
    let text = fs::read_to_string(path).map_err(RecipeError::Io)?;
    let report = store.import_text(&text)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} recipes from {}",
        report.imported,
        path.display()
    )));
    if report.skipped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} unreadable rows",
            report.skipped
        )));
    }
    if report.duplicates > 0 {
        result.add_message(CmdMessage::info(format!(
            "{} rows repeated an earlier id; the last one was kept",
            report.duplicates
        )));
    }
    result.affected = store.snapshot().as_ref().clone();
    result.import = Some(report);
    Ok(result)
}
