//! Suggested fixes attached to diagnostics. Never applied by the checker.

use serde::{Deserialize, Serialize};
use svstyle_source::Span;

/// A text replacement proposed as part of a suggested fix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// The source span to replace.
    pub span: Span,
    /// The text that would replace the span.
    pub new_text: String,
}

/// A suggested fix: a description plus the replacements that implement it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFix {
    /// A description of what this fix does.
    pub message: String,
    /// The set of text replacements that implement this fix.
    pub replacements: Vec<Replacement>,
}

impl SuggestedFix {
    /// Creates a fix consisting of a single replacement.
    pub fn replace(message: impl Into<String>, span: Span, new_text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacements: vec![Replacement {
                span,
                new_text: new_text.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_replacement() {
        let fix = SuggestedFix::replace("use `||`", Span::DUMMY, "||");
        assert_eq!(fix.replacements.len(), 1);
        assert_eq!(fix.replacements[0].new_text, "||");
    }
}
