//! # Query Engine
//!
//! Derives the visible subset of the record set: filter, then sort, then
//! optionally reverse.
//!
//! ## Filtering
//!
//! A recipe is visible when both hold:
//! - no search text, or the lowercased search text is a substring of the
//!   lowercased `title + ingredients + tags`
//! - no category filter, or the category matches exactly
//!
//! ## Sorting
//!
//! [`SortKey`] picks the primary comparator. Ties on the primary key fall back to
//! title, then id, so iteration order is fully deterministic. The sort itself is
//! stable (`slice::sort_by`).
//!
//! - Empty category sorts after every non-empty category.
//! - Absent numbers sort after present ones.
//!
//! ## Reversal
//!
//! `reverse` flips the finished, stable result (`Vec::reverse`). It does not
//! negate the comparator. The two differ for elements that tie on every key:
//! negating would leave them in input order, reversing puts them in reverse
//! input order, mirroring the forward listing exactly.

use crate::model::Recipe;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    CategoryTitle,
    Title,
    TotalMinutes,
    Calories,
    Servings,
}

impl std::str::FromStr for SortKey {
    type Err = crate::error::RecipeError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" | "category-title" => Ok(SortKey::CategoryTitle),
            "title" => Ok(SortKey::Title),
            "time" | "total-minutes" => Ok(SortKey::TotalMinutes),
            "calories" => Ok(SortKey::Calories),
            "servings" => Ok(SortKey::Servings),
            other => Err(crate::error::RecipeError::Api(format!(
                "Unknown sort key: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: SortKey,
    pub reverse: bool,
}

impl RecipeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let text_hit = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => recipe.search_haystack().contains(&term.to_lowercase()),
        };
        let category_hit = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => recipe.category == category,
        };
        text_hit && category_hit
    }

    /// Filter, sort and optionally reverse `recipes`, returning owned copies.
    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        let mut visible: Vec<Recipe> = recipes
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        sort_recipes(&mut visible, self.sort);
        if self.reverse {
            visible.reverse();
        }
        visible
    }
}

/// Stable sort by `key`, tie-broken on title then id.
pub fn sort_recipes(recipes: &mut [Recipe], key: SortKey) {
    recipes.sort_by(|a, b| {
        primary(a, b, key)
            .then_with(|| compare_titles(a, b))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn primary(a: &Recipe, b: &Recipe, key: SortKey) -> Ordering {
    match key {
        SortKey::CategoryTitle => compare_categories(&a.category, &b.category),
        SortKey::Title => Ordering::Equal,
        SortKey::TotalMinutes => compare_optional(a.total_minutes(), b.total_minutes()),
        SortKey::Calories => compare_optional(a.calories, b.calories),
        SortKey::Servings => compare_optional(a.servings, b.servings),
    }
}

fn compare_categories(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

fn compare_titles(a: &Recipe, b: &Recipe) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct non-empty categories in first-seen order.
pub fn categories(recipes: &[Recipe]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for recipe in recipes {
        if !recipe.category.is_empty() && !seen.contains(&recipe.category) {
            seen.push(recipe.category.clone());
        }
    }
    seen
}
