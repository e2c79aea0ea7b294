//! # Domain Model: Recipes and the Raw Row Boundary
//!
//! This module defines the one entity the store knows about, [`Recipe`], and the
//! loosely-typed [`RawRow`] that every parser path produces before normalization.
//!
//! ## Two Representations
//!
//! ```text
//!  interchange text ──decode──▶ RawRow ──normalize──▶ Recipe
//!                   ◀─encode── RawRow ◀──to_row────── Recipe
//! ```
//!
//! A `RawRow` is a plain map of column name to cell text. Nothing in it is
//! validated: columns may be missing, unknown columns may be present, numbers may
//! be garbage. It exists so that the untyped boundary is confined to a single
//! conversion point ([`crate::normalize`]); nothing else in the crate reads cells.
//!
//! A `Recipe` always has every field. Numeric fields are `Option<f64>`: `None`
//! means "unknown" and is distinct from `Some(0.0)`. List fields are vectors in
//! memory but travel as single delimited cells on the wire.
//!
//! ## Wire Delimiters
//!
//! | Field | In memory | On the wire |
//! |-------|-----------|-------------|
//! | `tags` | `Vec<String>` | joined with `;` |
//! | `ingredients` | `Vec<String>` | joined with `|` |
//! | `steps` | `Vec<String>` | joined with `\n` |
//!
//! The delimiters are part of the file format. Changing them breaks every file
//! written before the change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TAG_DELIMITER: char = ';';
pub const INGREDIENT_DELIMITER: char = '|';
pub const STEP_DELIMITER: char = '\n';

/// Columns of the interchange format, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Title,
    Category,
    Tags,
    Ingredients,
    Steps,
    PrepMinutes,
    CookMinutes,
    Servings,
    Calories,
    ImageUrl,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Id,
        Field::Title,
        Field::Category,
        Field::Tags,
        Field::Ingredients,
        Field::Steps,
        Field::PrepMinutes,
        Field::CookMinutes,
        Field::Servings,
        Field::Calories,
        Field::ImageUrl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Category => "category",
            Field::Tags => "tags",
            Field::Ingredients => "ingredients",
            Field::Steps => "steps",
            Field::PrepMinutes => "prep_minutes",
            Field::CookMinutes => "cook_minutes",
            Field::Servings => "servings",
            Field::Calories => "calories",
            Field::ImageUrl => "image_url",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// The canonical header. Every producer (seed, export, write-back) must emit
/// exactly this column order so that one decoder reads all of them.
pub fn canonical_fields() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.name()).collect()
}

/// A decoded row: column name to raw cell text.
///
/// A missing key means the column was absent from the row (ragged input) or from
/// the header; an empty value means the cell was present but blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.get(field.name())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is empty or whitespace (e.g. a line of bare commas).
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }

    /// Overlay the cells of `other` on top of this row.
    pub fn merge(&mut self, other: RawRow) {
        self.cells.extend(other.cells);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// One recipe. Every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    /// Empty string means "uncategorized".
    pub category: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub prep_minutes: Option<f64>,
    pub cook_minutes: Option<f64>,
    pub servings: Option<f64>,
    pub calories: Option<f64>,
    /// Empty, an external URL, or a path relative to the backend root.
    pub image_url: String,
}

impl Recipe {
    /// Prep plus cook time. Unknown when both parts are unknown; a single
    /// unknown part counts as zero.
    pub fn total_minutes(&self) -> Option<f64> {
        match (self.prep_minutes, self.cook_minutes) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0.0) + cook.unwrap_or(0.0)),
        }
    }

    /// The wire text of a single field.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Id => self.id.clone(),
            Field::Title => self.title.clone(),
            Field::Category => self.category.clone(),
            Field::Tags => join_list(&self.tags, TAG_DELIMITER),
            Field::Ingredients => join_list(&self.ingredients, INGREDIENT_DELIMITER),
            Field::Steps => join_list(&self.steps, STEP_DELIMITER),
            Field::PrepMinutes => format_number(self.prep_minutes),
            Field::CookMinutes => format_number(self.cook_minutes),
            Field::Servings => format_number(self.servings),
            Field::Calories => format_number(self.calories),
            Field::ImageUrl => self.image_url.clone(),
        }
    }

    /// Convert back to the raw boundary type, one cell per canonical field.
    pub fn to_row(&self) -> RawRow {
        Field::ALL
            .iter()
            .map(|f| (f.name(), self.field_text(*f)))
            .collect()
    }

    /// Text the search filter matches against: title, ingredients, tags.
    pub fn search_haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.field_text(Field::Ingredients),
            self.field_text(Field::Tags)
        )
        .to_lowercase()
    }
}

/// Split a delimited cell into trimmed, non-empty items.
pub fn split_list(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(items: &[String], delimiter: char) -> String {
    let mut buf = [0u8; 4];
    items.join(delimiter.encode_utf8(&mut buf))
}

/// Numbers are written in their shortest round-tripping form (`5`, not `5.0`);
/// absent values are written as an empty cell.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(n) => format!("{}", n),
        None => String::new(),
    }
}
