use crate::assets::{AssetCache, AssetResolver, ImageRef};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RecipeError, Result};
use crate::store::RecipeStore;

/// Full records by id. When an asset cache is available, relative image
/// references are resolved and their files reported in `paths`; a missing
/// image is a warning, not an error.
pub fn run<R: AssetResolver>(
    store: &RecipeStore,
    ids: &[String],
    mut assets: Option<&mut AssetCache<R>>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for id in ids {
        let recipe = store
            .get(id)
            .ok_or_else(|| RecipeError::RecordNotFound(id.clone()))?;

        if let ImageRef::Relative(reference) = ImageRef::classify(&recipe.image_url) {
            match assets.as_deref_mut().and_then(|cache| cache.get(reference)) {
                Some(handle) => result.paths.push(handle.path.clone()),
                None => result.add_message(CmdMessage::warning(format!(
                    "Image not found for {}: {}",
                    recipe.id, reference
                ))),
            }
        }
        result.listed.push(recipe);
    }
    Ok(result)
}
