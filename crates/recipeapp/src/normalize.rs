//! # Normalization
//!
//! Every recipe in memory came through here, whether it was read from a backend,
//! fetched as the network seed, imported from a file, or typed into a form.
//! [`Normalizer::normalize`] turns a [`RawRow`] into a [`Recipe`] that satisfies
//! the model invariants:
//!
//! - **Identifier**: a non-empty trimmed `id` cell is used verbatim. Otherwise an
//!   id is synthesized as `R` + batch counter + random suffix. The normalizer
//!   remembers every id it has seen or issued and never hands out one of them
//!   twice, so a batch cannot contain two synthesized ids that collide.
//! - **Numbers**: `prep_minutes`, `cook_minutes`, `servings` and `calories` are
//!   parsed as `f64` after trimming. Empty, unparseable and non-finite values
//!   become `None`. They are never coerced to `0`.
//! - **Text**: missing text cells become `""`.
//! - **Lists**: split on their wire delimiter, items trimmed, blanks dropped.
//!
//! Normalizing is idempotent: for a normalized recipe `r`,
//! `normalize(&r.to_row()) == r`.

use crate::model::{
    split_list, Field, RawRow, Recipe, INGREDIENT_DELIMITER, STEP_DELIMITER, TAG_DELIMITER,
};
use rand::Rng;
use std::collections::HashSet;

const ID_PREFIX: char = 'R';
const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 5;

/// Stateful normalizer for one batch.
#[derive(Debug, Default)]
pub struct Normalizer {
    counter: u64,
    issued: HashSet<String>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A normalizer that will never synthesize any of `ids`. Used when adding to
    /// an existing set so a new id cannot shadow a live one.
    pub fn with_reserved<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counter: 0,
            issued: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn normalize(&mut self, row: &RawRow) -> Recipe {
        let id = match row.field(Field::Id).map(str::trim) {
            Some(id) if !id.is_empty() => {
                self.issued.insert(id.to_string());
                id.to_string()
            }
            _ => self.synthesize_id(),
        };

        Recipe {
            id,
            title: text(row, Field::Title),
            category: text(row, Field::Category),
            tags: list(row, Field::Tags, TAG_DELIMITER),
            ingredients: list(row, Field::Ingredients, INGREDIENT_DELIMITER),
            steps: list(row, Field::Steps, STEP_DELIMITER),
            prep_minutes: number(row, Field::PrepMinutes),
            cook_minutes: number(row, Field::CookMinutes),
            servings: number(row, Field::Servings),
            calories: number(row, Field::Calories),
            image_url: text(row, Field::ImageUrl),
        }
    }

    /// Issue a fresh id that this normalizer has not seen before.
    pub fn synthesize_id(&mut self) -> String {
        loop {
            self.counter += 1;
            let candidate = format!("{}{:X}{}", ID_PREFIX, self.counter, random_suffix());
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Normalize one batch of rows with a fresh [`Normalizer`].
pub fn normalize_rows(rows: &[RawRow]) -> Vec<Recipe> {
    let mut normalizer = Normalizer::new();
    rows.iter().map(|row| normalizer.normalize(row)).collect()
}

/// Parse a numeric cell. `None` for empty, unparseable or non-finite input.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn text(row: &RawRow, field: Field) -> String {
    row.field(field).unwrap_or("").trim().to_string()
}

fn list(row: &RawRow, field: Field, delimiter: char) -> Vec<String> {
    let value = row.field(field).unwrap_or("");
    if delimiter == STEP_DELIMITER {
        // Spreadsheet round trips may turn embedded newlines into CRLF.
        split_list(&value.replace("\r\n", "\n"), delimiter)
    } else {
        split_list(value, delimiter)
    }
}

fn number(row: &RawRow, field: Field) -> Option<f64> {
    row.field(field).and_then(parse_number)
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode, Encoding};
    use crate::model::canonical_fields;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_explicit_id_is_used_verbatim_after_trim() {
        let r = Normalizer::new().normalize(&row(&[("id", "  abc-1 ")]));
        assert_eq!(r.id, "abc-1");
    }

    #[test]
    fn test_missing_or_blank_id_is_synthesized() {
        let mut n = Normalizer::new();
        let a = n.normalize(&row(&[("title", "A")]));
        let b = n.normalize(&row(&[("id", "   "), ("title", "B")]));
        assert!(a.id.starts_with('R'));
        assert!(!b.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_synthesized_ids_unique_within_batch() {
        let rows: Vec<RawRow> = (0..500).map(|_| RawRow::new()).collect();
        let recipes = normalize_rows(&rows);
        let ids: HashSet<_> = recipes.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_reserved_ids_are_never_synthesized() {
        let mut n = Normalizer::with_reserved(vec!["R1AAAAA".to_string()]);
        for _ in 0..50 {
            assert_ne!(n.synthesize_id(), "R1AAAAA");
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let r = Normalizer::new().normalize(&row(&[("id", "x")]));
        assert_eq!(r.title, "");
        assert_eq!(r.category, "");
        assert!(r.tags.is_empty());
        assert!(r.steps.is_empty());
        assert_eq!(r.calories, None);
        assert_eq!(r.image_url, "");
    }

    #[test]
    fn test_empty_calories_is_absent_not_zero() {
        let mut n = Normalizer::new();
        let empty = n.normalize(&row(&[("id", "a"), ("calories", "")]));
        let zero = n.normalize(&row(&[("id", "b"), ("calories", "0")]));
        assert_eq!(empty.calories, None);
        assert_eq!(zero.calories, Some(0.0));
        assert_ne!(empty.calories, zero.calories);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_lists_are_split_on_wire_delimiters() {
        let r = Normalizer::new().normalize(&row(&[
            ("id", "a"),
            ("tags", "quick; easy;"),
            ("ingredients", "Pasta 200g | Water"),
            ("steps", "Boil water\r\nAdd pasta\n"),
        ]));
        assert_eq!(r.tags, vec!["quick", "easy"]);
        assert_eq!(r.ingredients, vec!["Pasta 200g", "Water"]);
        assert_eq!(r.steps, vec!["Boil water", "Add pasta"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = row(&[
            ("title", "  Soup "),
            ("tags", "warm;;winter"),
            ("ingredients", "Leek|Potato| "),
            ("prep_minutes", "10"),
            ("cook_minutes", "x"),
            ("servings", "0"),
        ]);
        let mut n = Normalizer::new();
        let once = n.normalize(&raw);
        let twice = n.normalize(&once.to_row());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_round_trip_through_codec() {
        let rows = vec![
            row(&[("id", "a"), ("title", "Mac, cheese"), ("steps", "one\ntwo")]),
            row(&[("id", "b"), ("title", "Toast"), ("calories", "0")]),
        ];
        let recipes = normalize_rows(&rows);
        let text = encode(&recipes, &canonical_fields(), Encoding::Spreadsheet);
        let back = normalize_rows(&decode(&text).unwrap().rows);
        assert_eq!(back, recipes);
    }
}
