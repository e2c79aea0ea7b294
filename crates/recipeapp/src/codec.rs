//! # Interchange Codec
//!
//! The store's native format and its import/export format are the same thing:
//! comma-separated text with a header row. This module converts between that text
//! and [`RawRow`]s / [`Recipe`]s. It is stateless.
//!
//! ## Escaping
//!
//! A cell containing a comma, a double quote, CR or LF is wrapped in double quotes
//! and its internal quotes are doubled (`a"b` → `"a""b"`). Every other cell is
//! written verbatim. Both encodings share this rule.
//!
//! ## Encodings
//!
//! - [`Encoding::Native`]: LF line endings, no byte-order mark. Used for
//!   write-through to backends and for the network seed.
//! - [`Encoding::Spreadsheet`]: UTF-8 BOM followed by CRLF line endings, so that
//!   spreadsheet applications pick the right charset when the file is opened.
//!
//! ## Decoding Tolerance
//!
//! Decoding never fails because of the *shape* of the data:
//! - header names are trimmed, a leading BOM is ignored
//! - fully empty lines are skipped
//! - unknown columns are kept in the row, missing columns are simply absent
//! - ragged rows keep whatever cells they have; cells past the header are dropped
//!
//! A row with a local defect (text after a closing quote, like `"abc"x`) is
//! skipped and counted in [`Decoded::skipped`]. Only a quoted field that is still
//! open at end of input makes the whole text unreadable
//! ([`RecipeError::MalformedInterchange`]).

use crate::error::{RecipeError, Result};
use crate::model::{RawRow, Recipe};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Native,
    Spreadsheet,
}

impl Encoding {
    fn line_ending(self) -> &'static str {
        match self {
            Encoding::Native => "\n",
            Encoding::Spreadsheet => "\r\n",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Native => "native",
            Encoding::Spreadsheet => "spreadsheet",
        }
    }
}

impl std::str::FromStr for Encoding {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "csv" => Ok(Encoding::Native),
            "spreadsheet" | "excel" => Ok(Encoding::Spreadsheet),
            other => Err(RecipeError::Api(format!("Unknown encoding: {}", other))),
        }
    }
}

/// Result of decoding one interchange text.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Decoded {
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Rows dropped because of a row-local defect.
    pub skipped: usize,
}

/// Encode recipes under the caller-supplied column order.
pub fn encode(recipes: &[Recipe], fields: &[&str], encoding: Encoding) -> String {
    let rows: Vec<RawRow> = recipes.iter().map(Recipe::to_row).collect();
    encode_rows(&rows, fields, encoding)
}

/// Encode raw rows. A column the row does not have is written as an empty cell.
pub fn encode_rows(rows: &[RawRow], fields: &[&str], encoding: Encoding) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        fields
            .iter()
            .map(|f| escape_cell(f))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let line = fields
            .iter()
            .map(|f| escape_cell(row.get(f).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    let body = lines.join(encoding.line_ending());
    match encoding {
        Encoding::Native => body,
        Encoding::Spreadsheet => format!("{}{}", BOM, body),
    }
}

fn escape_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One physical record as split by the tokenizer.
struct RawRecord {
    cells: Vec<String>,
    line: usize,
    defective: bool,
}

impl RawRecord {
    fn is_empty_line(&self) -> bool {
        self.cells.len() == 1 && self.cells[0].is_empty()
    }
}

/// Decode interchange text into raw rows keyed by the header.
pub fn decode(text: &str) -> Result<Decoded> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let records = tokenize(text)?;

    let mut records = records.into_iter().filter(|r| !r.is_empty_line());
    let header: Vec<String> = match records.next() {
        Some(first) => first.cells.iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(Decoded::default()),
    };

    let mut decoded = Decoded {
        header,
        ..Default::default()
    };

    for record in records {
        if record.defective {
            warn!(line = record.line, "skipping malformed interchange row");
            decoded.skipped += 1;
            continue;
        }
        if record.cells.len() > decoded.header.len() {
            debug!(
                line = record.line,
                extra = record.cells.len() - decoded.header.len(),
                "dropping cells past the header"
            );
        }
        let row: RawRow = decoded
            .header
            .iter()
            .zip(record.cells)
            .filter(|(column, _)| !column.is_empty())
            .map(|(column, cell)| (column.clone(), cell))
            .collect();
        decoded.rows.push(row);
    }

    Ok(decoded)
}

fn tokenize(text: &str) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut field = String::new();

    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = 1;
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut field_started = false;
    let mut defective = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                cells.push(std::mem::take(&mut field));
                after_quote = false;
                field_started = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                cells.push(std::mem::take(&mut field));
                records.push(RawRecord {
                    cells: std::mem::take(&mut cells),
                    line: record_line,
                    defective,
                });
                line += 1;
                record_line = line;
                after_quote = false;
                field_started = false;
                defective = false;
            }
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
                quote_line = line;
            }
            _ => {
                if after_quote {
                    defective = true;
                }
                field_started = true;
                field.push(c);
            }
        }
    }

    if in_quotes {
        return Err(RecipeError::MalformedInterchange { line: quote_line });
    }

    if field_started || !cells.is_empty() {
        cells.push(field);
        records.push(RawRecord {
            cells,
            line: record_line,
            defective,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::canonical_fields;

    #[test]
    fn test_escape_only_when_needed() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_encode_header_follows_caller_order() {
        let text = encode(&[], &["title", "id"], Encoding::Native);
        assert_eq!(text, "title,id");
    }

    #[test]
    fn test_encode_unknown_column_is_empty() {
        let row = RawRow::new().with("id", "R1");
        let text = encode_rows(&[row], &["id", "extra"], Encoding::Native);
        assert_eq!(text, "id,extra\nR1,");
    }

    #[test]
    fn test_spreadsheet_encoding_has_bom_and_crlf() {
        let row = RawRow::new().with("id", "R1").with("title", "Soup");
        let text = encode_rows(&[row], &["id", "title"], Encoding::Spreadsheet);
        assert_eq!(text, "\u{feff}id,title\r\nR1,Soup");
    }

    #[test]
    fn test_decode_reads_spreadsheet_encoding() {
        let decoded = decode("\u{feff}id,title\r\nR1,Soup\r\n").unwrap();
        assert_eq!(decoded.header, vec!["id", "title"]);
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].get("title"), Some("Soup"));
    }

    #[test]
    fn test_decode_trims_header_names() {
        let decoded = decode(" id , title \nR1,Soup").unwrap();
        assert_eq!(decoded.header, vec!["id", "title"]);
        assert_eq!(decoded.rows[0].get("id"), Some("R1"));
    }

    #[test]
    fn test_decode_quoted_cells_with_newlines_and_quotes() {
        let text = "id,steps,title\nR1,\"Boil\nDrain\",\"The \"\"best\"\", pasta\"";
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].get("steps"), Some("Boil\nDrain"));
        assert_eq!(decoded.rows[0].get("title"), Some("The \"best\", pasta"));
    }

    #[test]
    fn test_decode_skips_empty_lines() {
        let decoded = decode("id,title\n\nR1,A\n\n\nR2,B\n").unwrap();
        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_decode_ragged_rows_keep_present_columns() {
        let decoded = decode("id,title,category\nR1,Soup\nR2,Stew,Dinner,extra").unwrap();
        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.rows[0].get("category"), None);
        assert_eq!(decoded.rows[1].get("category"), Some("Dinner"));
        assert_eq!(decoded.rows[1].len(), 3);
    }

    #[test]
    fn test_decode_preserves_unknown_columns() {
        let decoded = decode("id,rating\nR1,5").unwrap();
        assert_eq!(decoded.rows[0].get("rating"), Some("5"));
    }

    #[test]
    fn test_decode_unterminated_quote_is_malformed() {
        let err = decode("id,title\nR1,ok\nR2,\"never closed").unwrap_err();
        match err {
            RecipeError::MalformedInterchange { line } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_skips_row_with_text_after_closing_quote() {
        let decoded = decode("id,title\nR1,\"abc\"x\nR2,fine").unwrap();
        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].get("id"), Some("R2"));
    }

    #[test]
    fn test_decode_quote_inside_unquoted_cell_is_literal() {
        let decoded = decode("id,title\nR1,5\" pan").unwrap();
        assert_eq!(decoded.rows[0].get("title"), Some("5\" pan"));
    }

    #[test]
    fn test_decode_empty_text() {
        assert_eq!(decode("").unwrap(), Decoded::default());
        let decoded = decode("id,title").unwrap();
        assert!(decoded.rows.is_empty());
        assert_eq!(decoded.header.len(), 2);
    }

    #[test]
    fn test_encode_then_decode_keeps_awkward_cells() {
        let row = RawRow::new()
            .with("id", "R1")
            .with("title", "Mac, \"cheese\"")
            .with("steps", "one\ntwo");
        let fields = canonical_fields();
        for encoding in [Encoding::Native, Encoding::Spreadsheet] {
            let decoded = decode(&encode_rows(&[row.clone()], &fields, encoding)).unwrap();
            assert_eq!(decoded.rows[0].get("title"), Some("Mac, \"cheese\""));
            assert_eq!(decoded.rows[0].get("steps"), Some("one\ntwo"));
        }
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("native".parse::<Encoding>().unwrap(), Encoding::Native);
        assert_eq!(
            "Spreadsheet".parse::<Encoding>().unwrap(),
            Encoding::Spreadsheet
        );
        assert!("xml".parse::<Encoding>().is_err());
    }
}
