use crate::commands::{label, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Field, RawRow};
use crate::normalize::Normalizer;
use crate::store::RecipeStore;

/// Create a new recipe from form-like text cells. Any id in the draft is
/// ignored; the store issues a fresh one.
pub fn run(store: &RecipeStore, draft: &RawRow) -> Result<CmdResult> {
    let mut recipe = Normalizer::new().normalize(draft);
    recipe.id = String::new();

    let saved = store.put(recipe)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Recipe added ({}): {}",
        saved.id,
        label(&saved)
    )));
    if draft.field(Field::Title).map(str::trim).unwrap_or("").is_empty() {
        result.add_message(CmdMessage::warning("Recipe has no title"));
    }
    Ok(result.with_affected(vec![saved]))
}
