//! Free-form yes/no tokens from the sheet to strict booleans.

use crate::config::Cell;

/// Accepted spellings of "present", compared after trimming and lower-casing.
pub const TRUTHY_TOKENS: [&str; 5] = ["oui", "yes", "1", "true", "vrai"];

/// A presence flag as found in the input.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RawFlag<'a> {
    Text(&'a str),
    Bool(bool),
}

impl<'a> From<&'a str> for RawFlag<'a> {
    fn from(s: &'a str) -> Self {
        RawFlag::Text(s)
    }
}

impl From<bool> for RawFlag<'_> {
    fn from(b: bool) -> Self {
        RawFlag::Bool(b)
    }
}

impl<'a> From<&'a Cell> for RawFlag<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Text(s) => RawFlag::Text(s.as_str()),
            Cell::Bool(b) => RawFlag::Bool(*b),
        }
    }
}

/// Total over its input: anything that is not a known truthy token is false.
pub fn normalize<'a>(value: impl Into<RawFlag<'a>>) -> bool {
    match value.into() {
        RawFlag::Bool(b) => b,
        RawFlag::Text(s) => {
            let token = s.trim().to_lowercase();
            TRUTHY_TOKENS.contains(&token.as_str())
        }
    }
}
