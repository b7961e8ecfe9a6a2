//! Lexer and parser error types.

use svstyle_source::Span;

/// What went wrong while lexing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// A string literal reached a newline or the end of input.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A block comment reached the end of input.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// A string contains an escape sequence the language does not define.
    #[error("invalid escape sequence `\\{0}` in string literal")]
    InvalidEscape(char),
    /// A based literal has no digits or digits invalid for its base.
    #[error("malformed based literal `{0}`")]
    MalformedBasedLiteral(String),
    /// A character that cannot start any token.
    #[error("unrecognized character `{0}`")]
    UnrecognizedCharacter(char),
}

/// A lexical error with its position.
///
/// In strict mode the first `LexError` aborts the file; in best-effort mode
/// every error is collected and the offending characters become
/// [`SvToken::Error`](crate::SvToken::Error) tokens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {kind}")]
pub struct LexError {
    /// The kind of error.
    pub kind: LexErrorKind,
    /// Span of the offending characters.
    pub span: Span,
    /// 1-based line of the error.
    pub line: u32,
    /// 1-based character column of the error.
    pub column: u32,
}

/// A structural error, recoverable at the next top-level construct.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Span of the token where the problem was detected.
    pub span: Span,
    /// 1-based line of the error.
    pub line: u32,
    /// 1-based character column of the error.
    pub column: u32,
}
