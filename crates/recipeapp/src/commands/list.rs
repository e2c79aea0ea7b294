use crate::commands::CmdResult;
use crate::error::Result;
use crate::query::RecipeQuery;
use crate::store::RecipeStore;

pub fn run(store: &RecipeStore, query: &RecipeQuery) -> Result<CmdResult> {
    let snapshot = store.snapshot();
    let mut result = CmdResult::default().with_listed(query.apply(&snapshot));
    result.categories = crate::query::categories(&snapshot);
    Ok(result)
}
