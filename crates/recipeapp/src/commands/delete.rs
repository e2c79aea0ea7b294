use crate::commands::{label, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecipeStore;

pub fn run(store: &RecipeStore, ids: &[String]) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for id in ids {
        let existing = store.get(id);
        if store.delete(id)? {
            if let Some(recipe) = existing {
                result.add_message(CmdMessage::success(format!(
                    "Recipe deleted ({}): {}",
                    recipe.id,
                    label(&recipe)
                )));
                result.affected.push(recipe);
            }
        } else {
            result.add_message(CmdMessage::info(format!(
                "No recipe with id {}, nothing to delete",
                id
            )));
        }
    }

    Ok(result)
}
