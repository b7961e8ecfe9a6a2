//! Lossless lexical analyzer for (System)Verilog source text.
//!
//! Every byte of the input belongs to exactly one token, including
//! whitespace runs, newlines, and comments, and the stream always ends with
//! a zero-width [`SvToken::Eof`]. Concatenating the token texts therefore
//! reproduces the input, which the alignment and formatting rules rely on.
//!
//! Each token records the 1-based line and character column of its first
//! character. Columns count UTF-8 characters, not bytes.

use crate::error::{LexError, LexErrorKind};
use crate::token::{lookup_keyword, SvToken, Token};
use svstyle_source::{FileId, Span};

/// Lexes `source` strictly: the first lexical error aborts the file.
pub fn lex(source: &str, file: FileId) -> Result<Vec<Token>, LexError> {
    let (tokens, mut errors) = lex_best_effort(source, file);
    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors.swap_remove(0))
    }
}

/// Lexes `source`, turning malformed input into [`SvToken::Error`] tokens.
///
/// Returns the complete token stream together with every error found.
pub fn lex_best_effort(source: &str, file: FileId) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer {
        text: source,
        source: source.as_bytes(),
        pos: 0,
        file,
        line: 1,
        line_start: 0,
        tokens: Vec::new(),
        errors: Vec::new(),
    };
    lexer.lex_all();
    (lexer.tokens, lexer.errors)
}

/// Multi-character operators first so that the longest match wins.
const OPERATORS: &[(&str, SvToken)] = &[
    ("<<<=", SvToken::TripleLessEquals),
    (">>>=", SvToken::TripleGreaterEquals),
    ("===", SvToken::TripleEquals),
    ("!==", SvToken::BangDoubleEquals),
    ("==?", SvToken::WildcardEq),
    ("!=?", SvToken::WildcardNeq),
    ("<<<", SvToken::TripleLess),
    (">>>", SvToken::TripleGreater),
    ("<<=", SvToken::DoubleLessEquals),
    (">>=", SvToken::DoubleGreaterEquals),
    ("==", SvToken::DoubleEquals),
    ("!=", SvToken::BangEquals),
    ("<=", SvToken::LessEquals),
    (">=", SvToken::GreaterEquals),
    ("<<", SvToken::DoubleLess),
    (">>", SvToken::DoubleGreater),
    ("**", SvToken::DoubleStar),
    ("&&", SvToken::DoubleAmpersand),
    ("||", SvToken::DoublePipe),
    ("~^", SvToken::TildeCaret),
    ("^~", SvToken::TildeCaret),
    ("~&", SvToken::TildeAmpersand),
    ("~|", SvToken::TildePipe),
    ("++", SvToken::PlusPlus),
    ("--", SvToken::MinusMinus),
    ("+=", SvToken::PlusEquals),
    ("-=", SvToken::MinusEquals),
    ("*=", SvToken::StarEquals),
    ("/=", SvToken::SlashEquals),
    ("%=", SvToken::PercentEquals),
    ("&=", SvToken::AmpersandEquals),
    ("|=", SvToken::PipeEquals),
    ("^=", SvToken::CaretEquals),
    ("::", SvToken::ColonColon),
    ("->", SvToken::Arrow),
    ("(", SvToken::LeftParen),
    (")", SvToken::RightParen),
    ("[", SvToken::LeftBracket),
    ("]", SvToken::RightBracket),
    ("{", SvToken::LeftBrace),
    ("}", SvToken::RightBrace),
    (",", SvToken::Comma),
    (";", SvToken::Semicolon),
    (":", SvToken::Colon),
    (".", SvToken::Dot),
    ("#", SvToken::Hash),
    ("@", SvToken::At),
    ("=", SvToken::Equals),
    ("<", SvToken::LessThan),
    (">", SvToken::GreaterThan),
    ("+", SvToken::Plus),
    ("-", SvToken::Minus),
    ("*", SvToken::Star),
    ("/", SvToken::Slash),
    ("%", SvToken::Percent),
    ("&", SvToken::Ampersand),
    ("|", SvToken::Pipe),
    ("^", SvToken::Caret),
    ("~", SvToken::Tilde),
    ("!", SvToken::Bang),
    ("?", SvToken::Question),
];

const TIME_UNITS: &[&str] = &["ms", "us", "ns", "ps", "fs", "s"];

struct Lexer<'a> {
    text: &'a str,
    source: &'a [u8],
    pos: usize,
    file: FileId,
    line: u32,
    line_start: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl Lexer<'_> {
    fn lex_all(&mut self) {
        while self.pos < self.source.len() {
            let start = self.pos;
            let kind = self.next_kind(start);
            debug_assert!(self.pos > start, "lexer made no progress");
            self.push(kind, start);
        }
        self.push(SvToken::Eof, self.pos);
    }

    fn push(&mut self, kind: SvToken, start: usize) {
        let column = self.column_of(start);
        self.tokens.push(Token {
            kind,
            span: Span::new(self.file, start as u32, self.pos as u32),
            line: self.line,
            column,
        });
        for i in start..self.pos {
            if self.source[i] == b'\n' {
                self.line += 1;
                self.line_start = i + 1;
            }
        }
    }

    /// Character column of `offset`, which must lie on the current line.
    fn column_of(&self, offset: usize) -> u32 {
        let chars = self.source[self.line_start..offset]
            .iter()
            .filter(|&&b| b & 0xC0 != 0x80)
            .count();
        chars as u32 + 1
    }

    fn error(&mut self, kind: LexErrorKind, start: usize, end: usize) {
        let column = self.column_of(start);
        self.errors.push(LexError {
            kind,
            span: Span::new(self.file, start as u32, end as u32),
            line: self.line,
            column,
        });
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn at_line_end(&self) -> bool {
        self.peek() == b'\n' || (self.peek() == b'\r' && self.peek_at(1) == b'\n')
    }

    fn next_kind(&mut self, start: usize) -> SvToken {
        let b = self.peek();
        match b {
            b'\n' => {
                self.pos += 1;
                SvToken::Newline
            }
            b'\r' if self.peek_at(1) == b'\n' => {
                self.pos += 2;
                SvToken::Newline
            }
            b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                while matches!(self.peek(), b' ' | b'\t' | b'\r' | 0x0b | 0x0c) && !self.at_line_end()
                {
                    self.pos += 1;
                }
                SvToken::Whitespace
            }
            b'/' if self.peek_at(1) == b'/' => {
                while self.pos < self.source.len() && !self.at_line_end() {
                    self.pos += 1;
                }
                SvToken::LineComment
            }
            b'/' if self.peek_at(1) == b'*' => self.lex_block_comment(start),
            b'`' => self.lex_directive(start),
            b'\\' => self.lex_backslash(start),
            b'$' => {
                self.pos += 1;
                self.eat_ident_chars();
                SvToken::SystemIdentifier
            }
            b'"' => self.lex_string(start),
            b'\'' => self.lex_tick(start),
            b'0'..=b'9' => self.lex_number(start),
            _ if is_ident_start(b) => {
                self.eat_ident_chars();
                let text = &self.text[start..self.pos];
                lookup_keyword(text).unwrap_or(SvToken::Identifier)
            }
            _ => self.lex_operator(start),
        }
    }

    fn eat_ident_chars(&mut self) {
        while is_ident_char(self.peek()) {
            self.pos += 1;
        }
    }

    fn lex_block_comment(&mut self, start: usize) -> SvToken {
        self.pos += 2;
        loop {
            if self.pos >= self.source.len() {
                self.error(LexErrorKind::UnterminatedComment, start, self.pos);
                return SvToken::Error;
            }
            if self.peek() == b'*' && self.peek_at(1) == b'/' {
                self.pos += 2;
                return SvToken::BlockComment;
            }
            self.pos += 1;
        }
    }

    fn lex_directive(&mut self, start: usize) -> SvToken {
        self.pos += 1;
        if is_ident_start(self.peek()) {
            self.eat_ident_chars();
            SvToken::Directive
        } else if matches!(self.peek(), b'`' | b'"') {
            // Token pasting and stringification inside macro bodies.
            self.pos += 1;
            SvToken::Directive
        } else {
            self.error(LexErrorKind::UnrecognizedCharacter('`'), start, self.pos);
            SvToken::Error
        }
    }

    fn lex_backslash(&mut self, start: usize) -> SvToken {
        self.pos += 1;
        if self.at_line_end() {
            return SvToken::LineContinuation;
        }
        while self.pos < self.source.len() && !self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == start + 1 {
            self.error(LexErrorKind::UnrecognizedCharacter('\\'), start, self.pos);
            return SvToken::Error;
        }
        SvToken::EscapedIdentifier
    }

    fn lex_string(&mut self, start: usize) -> SvToken {
        self.pos += 1;
        let mut bad_escape: Option<(usize, char)> = None;
        loop {
            if self.pos >= self.source.len() || self.at_line_end() {
                self.error(LexErrorKind::UnterminatedString, start, self.pos);
                return SvToken::Error;
            }
            match self.peek() {
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => {
                    let esc_start = self.pos;
                    self.pos += 1;
                    let Some(c) = self.text[self.pos..].chars().next() else {
                        continue;
                    };
                    if c == '\r' && self.peek_at(1) == b'\n' {
                        self.pos += 2;
                        continue;
                    }
                    let valid = matches!(c, 'n' | 't' | '\\' | '"' | 'v' | 'f' | 'a' | 'x' | '\n')
                        || ('0'..='7').contains(&c);
                    if !valid && bad_escape.is_none() {
                        bad_escape = Some((esc_start, c));
                    }
                    self.pos += c.len_utf8();
                }
                _ => self.pos += 1,
            }
        }
        match bad_escape {
            Some((at, c)) => {
                self.error(LexErrorKind::InvalidEscape(c), at, at + 1 + c.len_utf8());
                SvToken::Error
            }
            None => SvToken::StringLiteral,
        }
    }

    fn lex_tick(&mut self, start: usize) -> SvToken {
        let next = self.peek_at(1);
        if is_base_spec(next, self.peek_at(2)) {
            self.pos += 1;
            return self.lex_based_tail(start);
        }
        if matches!(next, b'0' | b'1' | b'x' | b'X' | b'z' | b'Z') && !is_ident_char(self.peek_at(2))
        {
            self.pos += 2;
            return SvToken::FillLiteral;
        }
        self.pos += 1;
        SvToken::Tick
    }

    fn lex_number(&mut self, start: usize) -> SvToken {
        self.eat_decimal_digits();

        if self.peek() == b'\'' && is_base_spec(self.peek_at(1), self.peek_at(2)) {
            self.pos += 1;
            return self.lex_based_tail(start);
        }

        let mut real = false;
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_decimal_digits();
            real = true;
        }
        if matches!(self.peek(), b'e' | b'E')
            && (self.peek_at(1).is_ascii_digit()
                || (matches!(self.peek_at(1), b'+' | b'-') && self.peek_at(2).is_ascii_digit()))
        {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            self.eat_decimal_digits();
            real = true;
        }

        for unit in TIME_UNITS {
            let end = self.pos + unit.len();
            if self.source.get(self.pos..end) == Some(unit.as_bytes())
                && !is_ident_char(self.source.get(end).copied().unwrap_or(0))
            {
                self.pos = end;
                return SvToken::TimeLiteral;
            }
        }

        if real {
            SvToken::RealLiteral
        } else {
            SvToken::IntLiteral
        }
    }

    /// Lexes the part of a based literal after the `'`: optional signedness,
    /// the base letter, and the digits.
    fn lex_based_tail(&mut self, start: usize) -> SvToken {
        if matches!(self.peek(), b's' | b'S') {
            self.pos += 1;
        }
        let base = self.peek().to_ascii_lowercase();
        self.pos += 1;
        let digits_start = self.pos;
        while is_based_digit(base, self.peek()) {
            self.pos += 1;
        }
        let no_digits = self.pos == digits_start;
        let trailing_junk = is_ident_char(self.peek());
        if no_digits || trailing_junk {
            self.eat_ident_chars();
            let text = self.text[start..self.pos].to_string();
            self.error(LexErrorKind::MalformedBasedLiteral(text), start, self.pos);
            return SvToken::Error;
        }
        SvToken::SizedLiteral
    }

    fn eat_decimal_digits(&mut self) {
        while self.peek().is_ascii_digit() || self.peek() == b'_' {
            self.pos += 1;
        }
    }

    fn lex_operator(&mut self, start: usize) -> SvToken {
        let rest = &self.source[self.pos..];
        if let Some((text, kind)) = OPERATORS
            .iter()
            .find(|(text, _)| rest.starts_with(text.as_bytes()))
        {
            self.pos += text.len();
            return *kind;
        }
        let c = self.text[self.pos..].chars().next().unwrap_or('\u{fffd}');
        self.pos += c.len_utf8().max(1);
        self.error(LexErrorKind::UnrecognizedCharacter(c), start, self.pos);
        SvToken::Error
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_base_spec(a: u8, b: u8) -> bool {
    let is_base = |c: u8| matches!(c.to_ascii_lowercase(), b'b' | b'o' | b'd' | b'h');
    is_base(a) || (matches!(a, b's' | b'S') && is_base(b))
}

fn is_based_digit(base: u8, ch: u8) -> bool {
    let ch = ch.to_ascii_lowercase();
    match base {
        b'b' => matches!(ch, b'0' | b'1' | b'x' | b'z' | b'?' | b'_'),
        b'o' => matches!(ch, b'0'..=b'7' | b'x' | b'z' | b'?' | b'_'),
        b'd' => ch.is_ascii_digit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
        b'h' => ch.is_ascii_hexdigit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
        _ => false,
    }
}
