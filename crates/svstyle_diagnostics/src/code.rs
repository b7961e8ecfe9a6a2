//! Diagnostic codes such as `C201` or `E102`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Hard errors: unreadable source and always-block discipline, prefixed with `E`.
    Error,
    /// Likely bugs, prefixed with `W`.
    Warning,
    /// Style-guide conventions, prefixed with `C`.
    Convention,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Convention => 'C',
        }
    }

    /// Maps a prefix character back to its category (case-insensitive).
    pub fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'E' => Some(Category::Error),
            'W' => Some(Category::Warning),
            'C' => Some(Category::Convention),
            _ => None,
        }
    }
}

/// A structured diagnostic code combining a category prefix and a number.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

impl FromStr for DiagnosticCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let category = chars.next().and_then(Category::from_prefix).ok_or(())?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        let number = digits.parse().map_err(|_| ())?;
        Ok(Self::new(category, number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Convention.prefix(), 'C');
        assert_eq!(Category::from_prefix('c'), Some(Category::Convention));
        assert_eq!(Category::from_prefix('T'), None);
    }

    #[test]
    fn display_format() {
        assert_eq!(DiagnosticCode::new(Category::Error, 101).to_string(), "E101");
        assert_eq!(DiagnosticCode::new(Category::Warning, 3).to_string(), "W003");
    }

    #[test]
    fn parse_codes() {
        assert_eq!(
            "C201".parse::<DiagnosticCode>(),
            Ok(DiagnosticCode::new(Category::Convention, 201))
        );
        assert_eq!(
            "w105".parse::<DiagnosticCode>(),
            Ok(DiagnosticCode::new(Category::Warning, 105))
        );
        assert!("naming-suffix".parse::<DiagnosticCode>().is_err());
        assert!("E".parse::<DiagnosticCode>().is_err());
        assert!("X101".parse::<DiagnosticCode>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Convention, 203);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
