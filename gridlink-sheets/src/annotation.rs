//! Primary key annotations within header cells.
//!
//! A header cell marks its column as part of the primary key by wrapping
//! the column name in parentheses, e.g. `(id)`. Only the first
//! parenthesised span of a cell is used and anything outside of it is
//! discarded.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// The column a header cell declares.
pub struct HeaderCell<'a> {
    pub name: &'a str,
    pub primary_key: bool,
}

fn primary_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((.+?)\)").expect("Pattern is valid"))
}

/// Parses the text of a header cell.
pub fn parse_header_cell(text: &str) -> HeaderCell<'_> {
    match primary_key_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
    {
        Some(inner) => HeaderCell {
            name: inner.as_str(),
            primary_key: true,
        },
        None => HeaderCell {
            name: text,
            primary_key: false,
        },
    }
}

/// Renders a column name as header cell text.
pub fn annotate(name: &str, primary_key: bool) -> String {
    if primary_key {
        format!("({name})")
    } else {
        name.to_string()
    }
}
