use crate::commands::{label, CmdMessage, CmdResult};
use crate::error::{RecipeError, Result};
use crate::model::RawRow;
use crate::normalize::Normalizer;
use crate::store::RecipeStore;

/// Replace every field of recipe `id` with the draft. Fields missing from the
/// draft end up empty or absent; callers that want to keep a value must send it.
pub fn run(store: &RecipeStore, id: &str, draft: &RawRow) -> Result<CmdResult> {
    if id.trim().is_empty() {
        return Err(RecipeError::RecordNotFound(id.to_string()));
    }

    let mut row = draft.clone();
    row.insert("id", id);
    let recipe = Normalizer::new().normalize(&row);
    let saved = store.replace_existing(recipe)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Recipe updated ({}): {}",
        saved.id,
        label(&saved)
    )));
    Ok(result.with_affected(vec![saved]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::store_with;

    #[test]
    fn replaces_all_fields() {
        let (store, _) = store_with("id,title,category,calories\na,Stew,Dinner,700");
        let draft = RawRow::new().with("title", "Beef stew");
        let result = run(&store, "a", &draft).unwrap();

        let saved = &result.affected[0];
        assert_eq!(saved.id, "a");
        assert_eq!(saved.title, "Beef stew");
        assert_eq!(saved.category, "");
        assert_eq!(saved.calories, None);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn draft_id_cannot_rename() {
        let (store, _) = store_with("id,title\na,Stew");
        let draft = RawRow::new().with("id", "b").with("title", "Soup");
        run(&store, "a", &draft).unwrap();
        assert!(store.get("b").is_none());
        assert_eq!(store.get("a").unwrap().title, "Soup");
    }

    #[test]
    fn unknown_id_fails() {
        let (store, backend) = store_with("id,title\na,Stew");
        let err = run(&store, "zzz", &RawRow::new()).unwrap_err();
        assert!(matches!(err, RecipeError::RecordNotFound(_)));
        assert_eq!(backend.writes(), 0);
    }
}
