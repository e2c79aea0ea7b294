use crate::codec::Encoding;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RecipeError, Result};
use crate::store::RecipeStore;
use std::fs;
use std::path::Path;

pub fn run(store: &RecipeStore, path: &Path, encoding: Encoding) -> Result<CmdResult> {
    let text = store.export_text(encoding);
    fs::write(path, text).map_err(RecipeError::Io)?;

    let count = store.snapshot().len();
    let mut result = CmdResult::default().with_paths(vec![path.to_path_buf()]);
    result.add_message(CmdMessage::success(format!(
        "Exported {} recipes to {} ({})",
        count,
        path.display(),
        encoding.name()
    )));
    Ok(result)
}
