//! Expression trees and the Pratt expression parser.
//!
//! Binding powers follow the SystemVerilog operator precedence table:
//!
//! | BP (L,R) | Operators |
//! |----------|-----------|
//! | (1,2)    | `||` |
//! | (3,4)    | `&&` |
//! | (5,6)    | `|` |
//! | (7,8)    | `^` `~^` `^~` |
//! | (9,10)   | `&` |
//! | (11,12)  | `==` `!=` `===` `!==` `==?` `!=?` |
//! | (13,14)  | `<` `<=` `>` `>=` `inside` |
//! | (15,16)  | `<<` `>>` `<<<` `>>>` |
//! | (17,18)  | `+` `-` |
//! | (19,20)  | `*` `/` `%` |
//! | (22,21)  | `**` (right-assoc) |
//! | prefix 23 | `+` `-` `!` `~` `&` `~&` `|` `~|` `^` `~^` `++` `--` |
//!
//! Ternary `? :` is handled as a special case at min_bp=0 (right-associative).
//! Sensitivity lists parse events at min_bp=6 so that `|` and `||` end an
//! event instead of joining two of them.

use crate::error::ParseError;
use crate::parser::SvParser;
use crate::token::SvToken;
use serde::{Deserialize, Serialize};
use svstyle_common::Ident;
use svstyle_source::Span;

/// An expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A signal, parameter, or enum member, with any selects applied to it.
    Name {
        /// The (last component of the) name.
        name: Ident,
        /// Bit, part, and member selects in order.
        selects: Vec<Select>,
        /// Whether the name was package-scoped (`pkg::NAME`).
        qualified: bool,
        /// Span of the name and its selects.
        span: Span,
    },
    /// A numeric or string literal.
    Literal {
        /// The literal kind.
        kind: LiteralKind,
        /// Explicit width of a sized literal.
        width: Option<u32>,
        /// Value, when it is known and fits in 64 bits.
        value: Option<u64>,
        /// Span of the literal.
        span: Span,
    },
    /// A parenthesized expression.
    Paren {
        /// The inner expression.
        inner: Box<Expr>,
        /// Span including the parentheses.
        span: Span,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
        /// Span of the operator token.
        op_span: Span,
        /// Span of the whole expression.
        span: Span,
    },
    /// `cond ? a : b`
    Ternary {
        /// The condition.
        cond: Box<Expr>,
        /// Value when true.
        then_expr: Box<Expr>,
        /// Value when false.
        else_expr: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `{a, b, c}`
    Concat {
        /// The elements.
        elements: Vec<Expr>,
        /// Span including the braces.
        span: Span,
    },
    /// `{n{a, b}}`
    Replicate {
        /// The replication count.
        count: Box<Expr>,
        /// The replicated elements.
        elements: Vec<Expr>,
        /// Span including the braces.
        span: Span,
    },
    /// A function or system function call.
    Call {
        /// The function name; system calls keep the leading `$`.
        name: Ident,
        /// Whether this is a `$name` call.
        system: bool,
        /// Arguments.
        args: Vec<Expr>,
        /// Span of the whole call.
        span: Span,
    },
    /// `expr inside { ... }`
    Inside {
        /// The tested expression.
        expr: Box<Expr>,
        /// The set members; value ranges are opaque.
        set: Vec<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `type'(expr)`
    Cast {
        /// The cast target (a width, type name, or opaque type keyword).
        target: Box<Expr>,
        /// The cast operand.
        expr: Box<Expr>,
        /// Span of the whole cast.
        span: Span,
    },
    /// Macro uses, assignment patterns, streaming operators, and other
    /// constructs kept as raw spans.
    Opaque(Span),
}

impl Expr {
    /// Returns the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Name { span, .. }
            | Expr::Literal { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Concat { span, .. }
            | Expr::Replicate { span, .. }
            | Expr::Call { span, .. }
            | Expr::Inside { span, .. }
            | Expr::Cast { span, .. } => *span,
            Expr::Opaque(span) => *span,
        }
    }

    /// Looks through any number of enclosing parentheses.
    pub fn strip_parens(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren { inner, .. } = expr {
            expr = inner;
        }
        expr
    }

    /// Returns the name of a plain, unselected, unqualified name expression.
    pub fn as_plain_name(&self) -> Option<Ident> {
        match self.strip_parens() {
            Expr::Name {
                name,
                selects,
                qualified: false,
                ..
            } if selects.is_empty() => Some(*name),
            _ => None,
        }
    }

    /// Visits every name in this expression, including names nested inside
    /// selects and call arguments.
    pub fn for_each_name(&self, f: &mut dyn FnMut(Ident, Span)) {
        match self {
            Expr::Name {
                name,
                selects,
                span,
                ..
            } => {
                f(*name, *span);
                for select in selects {
                    select.for_each_expr(&mut |e| e.for_each_name(f));
                }
            }
            Expr::Paren { inner, .. } => inner.for_each_name(f),
            Expr::Unary { operand, .. } => operand.for_each_name(f),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.for_each_name(f);
                rhs.for_each_name(f);
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                cond.for_each_name(f);
                then_expr.for_each_name(f);
                else_expr.for_each_name(f);
            }
            Expr::Concat { elements, .. } => {
                for e in elements {
                    e.for_each_name(f);
                }
            }
            Expr::Replicate {
                count, elements, ..
            } => {
                count.for_each_name(f);
                for e in elements {
                    e.for_each_name(f);
                }
            }
            Expr::Call { args, .. } => {
                for e in args {
                    e.for_each_name(f);
                }
            }
            Expr::Inside { expr, set, .. } => {
                expr.for_each_name(f);
                for e in set {
                    e.for_each_name(f);
                }
            }
            Expr::Cast { expr, .. } => expr.for_each_name(f),
            Expr::Literal { .. } | Expr::Opaque(_) => {}
        }
    }
}

/// A select applied to a name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Select {
    /// `a[i]`
    Bit {
        /// The index.
        index: Expr,
        /// Span from `[` through `]`.
        span: Span,
    },
    /// `a[msb:lsb]`
    Range {
        /// Left bound.
        msb: Expr,
        /// Right bound.
        lsb: Expr,
        /// Span from `[` through `]`.
        span: Span,
    },
    /// `a[base +: width]` or `a[base -: width]`
    Indexed {
        /// Start index.
        base: Expr,
        /// Width of the slice.
        width: Expr,
        /// `true` for `+:`.
        ascending: bool,
        /// Span from `[` through `]`.
        span: Span,
    },
    /// `a.field`
    Member {
        /// The member name.
        name: Ident,
        /// Span of `.field`.
        span: Span,
    },
}

impl Select {
    /// Returns `true` for selects that can yield more than one bit.
    pub fn is_part_select(&self) -> bool {
        matches!(self, Select::Range { .. } | Select::Indexed { .. })
    }

    /// The span of this select.
    pub fn span(&self) -> Span {
        match self {
            Select::Bit { span, .. }
            | Select::Range { span, .. }
            | Select::Indexed { span, .. }
            | Select::Member { span, .. } => *span,
        }
    }

    fn for_each_expr(&self, f: &mut dyn FnMut(&Expr)) {
        match self {
            Select::Bit { index, .. } => f(index),
            Select::Range { msb, lsb, .. } => {
                f(msb);
                f(lsb);
            }
            Select::Indexed { base, width, .. } => {
                f(base);
                f(width);
            }
            Select::Member { .. } => {}
        }
    }
}

/// Literal kinds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LiteralKind {
    /// A plain decimal number or an unsized based literal (`'hF`).
    Unsized,
    /// A sized based literal (`8'hFF`).
    Sized,
    /// An unbased unsized fill literal (`'0`, `'1`, `'x`, `'z`).
    Fill,
    /// A real number.
    Real,
    /// A time literal (`10ns`).
    Time,
    /// A string.
    String,
}

/// Unary operators.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    LogNot,
    /// `~`
    BitNot,
    /// `&`
    RedAnd,
    /// `~&`
    RedNand,
    /// `|`
    RedOr,
    /// `~|`
    RedNor,
    /// `^`
    RedXor,
    /// `~^`
    RedXnor,
    /// `++`
    PreIncr,
    /// `--`
    PreDecr,
}

impl UnaryOp {
    /// Returns `true` for reduction operators, whose result is one bit.
    pub fn is_reduction(self) -> bool {
        matches!(
            self,
            UnaryOp::RedAnd
                | UnaryOp::RedNand
                | UnaryOp::RedOr
                | UnaryOp::RedNor
                | UnaryOp::RedXor
                | UnaryOp::RedXnor
        )
    }
}

/// Binary operators.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `||`
    LogOr,
    /// `&&`
    LogAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `~^`
    BitXnor,
    /// `&`
    BitAnd,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `===`
    CaseEq,
    /// `!==`
    CaseNeq,
    /// `==?`
    WildEq,
    /// `!=?`
    WildNeq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `<<<`
    AShl,
    /// `>>>`
    AShr,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// Relational and equality operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Neq
                | BinaryOp::CaseEq
                | BinaryOp::CaseNeq
                | BinaryOp::WildEq
                | BinaryOp::WildNeq
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }

    /// `&&` and `||`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::LogAnd | BinaryOp::LogOr)
    }

    /// `&`, `|`, `^`, `~^`.
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::BitXnor
        )
    }

    /// The operator as written.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::LogOr => "||",
            BinaryOp::LogAnd => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitXnor => "~^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::CaseEq => "===",
            BinaryOp::CaseNeq => "!==",
            BinaryOp::WildEq => "==?",
            BinaryOp::WildNeq => "!=?",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::AShl => "<<<",
            BinaryOp::AShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// Binding power for binary operators. Returns (left_bp, right_bp).
fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::LogOr => (1, 2),
        BinaryOp::LogAnd => (3, 4),
        BinaryOp::BitOr => (5, 6),
        BinaryOp::BitXor | BinaryOp::BitXnor => (7, 8),
        BinaryOp::BitAnd => (9, 10),
        BinaryOp::Eq
        | BinaryOp::Neq
        | BinaryOp::CaseEq
        | BinaryOp::CaseNeq
        | BinaryOp::WildEq
        | BinaryOp::WildNeq => (11, 12),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => (13, 14),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::AShl | BinaryOp::AShr => (15, 16),
        BinaryOp::Add | BinaryOp::Sub => (17, 18),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (19, 20),
        BinaryOp::Pow => (22, 21), // right-associative
    }
}

const INSIDE_BP: u8 = 13;
const PREFIX_BP: u8 = 23;

/// Width and value of a literal token.
fn literal_info(kind: SvToken, text: &str) -> (LiteralKind, Option<u32>, Option<u64>) {
    match kind {
        SvToken::IntLiteral => {
            let digits: String = text.chars().filter(|&c| c != '_').collect();
            (LiteralKind::Unsized, None, digits.parse().ok())
        }
        SvToken::SizedLiteral => {
            let (size, rest) = text.split_once('\'').unwrap_or(("", text));
            let width = size
                .chars()
                .filter(|&c| c != '_')
                .collect::<String>()
                .parse()
                .ok();
            let rest = rest.trim_start_matches(['s', 'S']);
            let mut chars = rest.chars();
            let radix = match chars.next().map(|c| c.to_ascii_lowercase()) {
                Some('b') => 2,
                Some('o') => 8,
                Some('h') => 16,
                _ => 10,
            };
            let digits: String = chars.filter(|&c| c != '_').collect();
            let value = u64::from_str_radix(&digits, radix).ok();
            let kind = if width.is_some() {
                LiteralKind::Sized
            } else {
                LiteralKind::Unsized
            };
            (kind, width, value)
        }
        SvToken::FillLiteral => {
            let value = (text == "'0").then_some(0);
            (LiteralKind::Fill, None, value)
        }
        SvToken::RealLiteral => (LiteralKind::Real, None, None),
        SvToken::TimeLiteral => (LiteralKind::Time, None, None),
        _ => (LiteralKind::String, None, None),
    }
}

impl SvParser<'_> {
    /// Parses an expression.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    /// Parses an expression with minimum binding power.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let lhs = self.parse_unary_expr()?;
        self.continue_expr_bp(lhs, min_bp)
    }

    /// Continues parsing infix operators after an already parsed left operand.
    fn continue_expr_bp(&mut self, mut lhs: Expr, min_bp: u8) -> Result<Expr, ParseError> {
        loop {
            if self.at(SvToken::Question) && min_bp == 0 {
                self.advance();
                let then_expr = self.parse_expr_bp(0)?;
                self.expect(SvToken::Colon, "`:` in conditional expression")?;
                let else_expr = self.parse_expr_bp(0)?;
                let span = lhs.span().merge(else_expr.span());
                lhs = Expr::Ternary {
                    cond: Box::new(lhs),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                    span,
                };
                continue;
            }

            if self.at(SvToken::Inside) && INSIDE_BP >= min_bp {
                self.advance();
                let set = self.parse_inside_set()?;
                let span = lhs.span().merge(self.prev_span());
                lhs = Expr::Inside {
                    expr: Box::new(lhs),
                    set,
                    span,
                };
                continue;
            }

            let Some(op) = self.current_as_binary_op() else {
                break;
            };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            let op_span = self.current_span();
            self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                op_span,
                span,
            };
        }
        Ok(lhs)
    }

    /// Parses a prefix operator application or a primary with its postfix
    /// selects. Assignment targets are parsed with this entry point so that a
    /// following `<=` is left for the statement parser.
    pub(crate) fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        let op = match self.current() {
            SvToken::PlusPlus => Some(UnaryOp::PreIncr),
            SvToken::MinusMinus => Some(UnaryOp::PreDecr),
            _ => self.current_as_unary_op(),
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_expr_bp(PREFIX_BP)?;
            let span = start.merge(operand.span());
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span,
            });
        }
        let primary = self.parse_primary_expr()?;
        self.parse_postfix(primary)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        match self.current() {
            kind if kind.is_literal() => {
                let (kind, width, value) = literal_info(kind, self.current_text());
                self.advance();
                Ok(Expr::Literal {
                    kind,
                    width,
                    value,
                    span: start,
                })
            }
            SvToken::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                let close = self.expect(SvToken::RightParen, "`)`")?;
                Ok(Expr::Paren {
                    inner: Box::new(inner),
                    span: start.merge(close),
                })
            }
            SvToken::LeftBrace => self.parse_concat(),
            SvToken::SystemIdentifier => {
                let name = self.interner.get_or_intern(self.current_text());
                self.advance();
                let args = if self.at(SvToken::LeftParen) {
                    self.parse_call_args()?
                } else {
                    Vec::new()
                };
                Ok(Expr::Call {
                    name,
                    system: true,
                    args,
                    span: start.merge(self.prev_span()),
                })
            }
            SvToken::Identifier | SvToken::EscapedIdentifier => self.parse_name_or_call(),
            SvToken::Directive => {
                self.advance();
                if self.at(SvToken::LeftParen) {
                    self.skip_group();
                }
                Ok(Expr::Opaque(start.merge(self.prev_span())))
            }
            SvToken::Tick if self.peek_kind(1) == SvToken::LeftBrace => {
                self.advance();
                self.skip_group();
                Ok(Expr::Opaque(start.merge(self.prev_span())))
            }
            SvToken::Type if self.peek_kind(1) == SvToken::LeftParen => {
                self.advance();
                self.skip_group();
                Ok(Expr::Opaque(start.merge(self.prev_span())))
            }
            // Type keywords appear as cast targets and `$bits` arguments.
            kind if kind.is_data_type() || matches!(kind, SvToken::Signed | SvToken::Unsigned) => {
                self.advance();
                Ok(Expr::Opaque(start))
            }
            _ => Err(self.expected("expression")),
        }
    }

    fn parse_name_or_call(&mut self) -> Result<Expr, ParseError> {
        let (mut name, mut span) = self.expect_ident()?;
        let mut qualified = false;
        while self.at(SvToken::ColonColon) && self.peek_kind(1).is_identifier() {
            self.advance();
            let (part, part_span) = self.expect_ident()?;
            name = part;
            span = span.merge(part_span);
            qualified = true;
        }
        if self.at(SvToken::LeftParen) {
            let args = self.parse_call_args()?;
            return Ok(Expr::Call {
                name,
                system: false,
                args,
                span: span.merge(self.prev_span()),
            });
        }
        Ok(Expr::Name {
            name,
            selects: Vec::new(),
            qualified,
            span,
        })
    }

    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            let select = match self.current() {
                SvToken::LeftBracket => self.parse_select()?,
                SvToken::Dot if self.peek_kind(1).is_identifier() => {
                    let dot = self.current_span();
                    self.advance();
                    let (name, name_span) = self.expect_ident()?;
                    Select::Member {
                        name,
                        span: dot.merge(name_span),
                    }
                }
                SvToken::Tick if self.peek_kind(1) == SvToken::LeftParen => {
                    self.advance();
                    self.advance();
                    let inner = self.parse_expr()?;
                    let close = self.expect(SvToken::RightParen, "`)`")?;
                    let span = expr.span().merge(close);
                    expr = Expr::Cast {
                        target: Box::new(expr),
                        expr: Box::new(inner),
                        span,
                    };
                    continue;
                }
                _ => return Ok(expr),
            };
            expr = match expr {
                Expr::Name {
                    name,
                    mut selects,
                    qualified,
                    span,
                } => {
                    let span = span.merge(select.span());
                    selects.push(select);
                    Expr::Name {
                        name,
                        selects,
                        qualified,
                        span,
                    }
                }
                other => Expr::Opaque(other.span().merge(select.span())),
            };
        }
    }

    /// Parses `[i]`, `[msb:lsb]`, `[base+:width]`, or `[base-:width]`.
    fn parse_select(&mut self) -> Result<Select, ParseError> {
        let open = self.expect(SvToken::LeftBracket, "`[`")?;
        // Stop before `+`/`-` so that `+:` and `-:` can be recognized.
        let first = self.parse_expr_bp(18)?;
        let indexed = match (self.current(), self.peek_kind(1)) {
            (SvToken::Plus, SvToken::Colon) => Some(true),
            (SvToken::Minus, SvToken::Colon) => Some(false),
            _ => None,
        };
        if let Some(ascending) = indexed {
            self.advance();
            self.advance();
            let width = self.parse_expr()?;
            let close = self.expect(SvToken::RightBracket, "`]`")?;
            return Ok(Select::Indexed {
                base: first,
                width,
                ascending,
                span: open.merge(close),
            });
        }
        let first = self.continue_expr_bp(first, 0)?;
        if self.eat(SvToken::Colon) {
            let lsb = self.parse_expr()?;
            let close = self.expect(SvToken::RightBracket, "`]`")?;
            return Ok(Select::Range {
                msb: first,
                lsb,
                span: open.merge(close),
            });
        }
        let close = self.expect(SvToken::RightBracket, "`]`")?;
        Ok(Select::Bit {
            index: first,
            span: open.merge(close),
        })
    }

    /// Parses a concatenation `{a, b}` or replication `{3{a, b}}`.
    fn parse_concat(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        if matches!(
            self.peek_kind(1),
            SvToken::DoubleLess | SvToken::DoubleGreater
        ) {
            // Streaming operator.
            self.skip_group();
            return Ok(Expr::Opaque(start.merge(self.prev_span())));
        }
        self.expect(SvToken::LeftBrace, "`{`")?;
        if self.at(SvToken::RightBrace) {
            return Err(self.error_here("empty concatenation"));
        }
        let first = self.parse_expr()?;

        if self.at(SvToken::LeftBrace) {
            let elements = match self.parse_concat()? {
                Expr::Concat { elements, .. } => elements,
                other => vec![other],
            };
            let close = self.expect(SvToken::RightBrace, "`}`")?;
            return Ok(Expr::Replicate {
                count: Box::new(first),
                elements,
                span: start.merge(close),
            });
        }

        let mut elements = vec![first];
        while self.eat(SvToken::Comma) {
            elements.push(self.parse_expr()?);
        }
        let close = self.expect(SvToken::RightBrace, "`}`")?;
        Ok(Expr::Concat {
            elements,
            span: start.merge(close),
        })
    }

    /// Parses the `{ ... }` set after `inside`.
    pub(crate) fn parse_inside_set(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(SvToken::LeftBrace, "`{` after `inside`")?;
        let mut set = Vec::new();
        if !self.at(SvToken::RightBrace) {
            loop {
                set.push(self.parse_value_range()?);
                if !self.eat(SvToken::Comma) {
                    break;
                }
            }
        }
        self.expect(SvToken::RightBrace, "`}`")?;
        Ok(set)
    }

    /// Parses an expression or a `[lo:hi]` value range, which is kept opaque.
    pub(crate) fn parse_value_range(&mut self) -> Result<Expr, ParseError> {
        if self.at(SvToken::LeftBracket) {
            let start = self.current_span();
            self.skip_group();
            Ok(Expr::Opaque(start.merge(self.prev_span())))
        } else {
            self.parse_expr()
        }
    }

    /// Parses call arguments: `( [expr {, expr}] )`.
    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(SvToken::LeftParen, "`(`")?;
        let mut args = Vec::new();
        if !self.at(SvToken::RightParen) {
            args.push(self.parse_expr()?);
            while self.eat(SvToken::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(SvToken::RightParen, "`)`")?;
        Ok(args)
    }

    /// Maps the current token to a binary operator, if applicable.
    fn current_as_binary_op(&self) -> Option<BinaryOp> {
        match self.current() {
            SvToken::DoublePipe => Some(BinaryOp::LogOr),
            SvToken::DoubleAmpersand => Some(BinaryOp::LogAnd),
            SvToken::Pipe => Some(BinaryOp::BitOr),
            SvToken::Caret => Some(BinaryOp::BitXor),
            SvToken::TildeCaret => Some(BinaryOp::BitXnor),
            SvToken::Ampersand => Some(BinaryOp::BitAnd),
            SvToken::DoubleEquals => Some(BinaryOp::Eq),
            SvToken::BangEquals => Some(BinaryOp::Neq),
            SvToken::TripleEquals => Some(BinaryOp::CaseEq),
            SvToken::BangDoubleEquals => Some(BinaryOp::CaseNeq),
            SvToken::WildcardEq => Some(BinaryOp::WildEq),
            SvToken::WildcardNeq => Some(BinaryOp::WildNeq),
            SvToken::LessThan => Some(BinaryOp::Lt),
            SvToken::LessEquals => Some(BinaryOp::Le),
            SvToken::GreaterThan => Some(BinaryOp::Gt),
            SvToken::GreaterEquals => Some(BinaryOp::Ge),
            SvToken::DoubleLess => Some(BinaryOp::Shl),
            SvToken::DoubleGreater => Some(BinaryOp::Shr),
            SvToken::TripleLess => Some(BinaryOp::AShl),
            SvToken::TripleGreater => Some(BinaryOp::AShr),
            SvToken::Plus => Some(BinaryOp::Add),
            SvToken::Minus => Some(BinaryOp::Sub),
            SvToken::Star => Some(BinaryOp::Mul),
            SvToken::Slash => Some(BinaryOp::Div),
            SvToken::Percent => Some(BinaryOp::Mod),
            SvToken::DoubleStar => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    /// Maps the current token to a unary operator, if applicable.
    fn current_as_unary_op(&self) -> Option<UnaryOp> {
        match self.current() {
            SvToken::Plus => Some(UnaryOp::Plus),
            SvToken::Minus => Some(UnaryOp::Minus),
            SvToken::Bang => Some(UnaryOp::LogNot),
            SvToken::Tilde => Some(UnaryOp::BitNot),
            SvToken::Ampersand => Some(UnaryOp::RedAnd),
            SvToken::TildeAmpersand => Some(UnaryOp::RedNand),
            SvToken::Pipe => Some(UnaryOp::RedOr),
            SvToken::TildePipe => Some(UnaryOp::RedNor),
            SvToken::Caret => Some(UnaryOp::RedXor),
            SvToken::TildeCaret => Some(UnaryOp::RedXnor),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use svstyle_common::Interner;
    use svstyle_source::FileId;

    fn parse_with<R>(source: &str, min_bp: u8, f: impl FnOnce(&Expr, &Interner) -> R) -> R {
        let interner = Interner::new();
        let tokens = lex(source, FileId::from_raw(0)).unwrap();
        let mut parser = SvParser::new(&tokens, source, &interner);
        let expr = parser.parse_expr_bp(min_bp).unwrap();
        f(&expr, &interner)
    }

    fn parse_expr_str(source: &str) -> Expr {
        parse_with(source, 0, |e, _| e.clone())
    }

    fn parse_err(source: &str) -> ParseError {
        let interner = Interner::new();
        let tokens = lex(source, FileId::from_raw(0)).unwrap();
        let mut parser = SvParser::new(&tokens, source, &interner);
        parser.parse_expr().unwrap_err()
    }

    #[test]
    fn simple_identifier() {
        parse_with("data_q", 0, |e, i| {
            let name = e.as_plain_name().unwrap();
            assert_eq!(i.resolve(name), "data_q");
        });
    }

    #[test]
    fn literal_widths_and_values() {
        match parse_expr_str("8'hFF") {
            Expr::Literal {
                kind, width, value, ..
            } => {
                assert_eq!(kind, LiteralKind::Sized);
                assert_eq!(width, Some(8));
                assert_eq!(value, Some(255));
            }
            other => panic!("expected literal, got {other:?}"),
        }
        match parse_expr_str("1'b0") {
            Expr::Literal { width, value, .. } => {
                assert_eq!(width, Some(1));
                assert_eq!(value, Some(0));
            }
            other => panic!("expected literal, got {other:?}"),
        }
        match parse_expr_str("4'b1x0z") {
            Expr::Literal { width, value, .. } => {
                assert_eq!(width, Some(4));
                assert_eq!(value, None);
            }
            other => panic!("expected literal, got {other:?}"),
        }
        match parse_expr_str("1_000") {
            Expr::Literal {
                kind, width, value, ..
            } => {
                assert_eq!(kind, LiteralKind::Unsized);
                assert_eq!(width, None);
                assert_eq!(value, Some(1000));
            }
            other => panic!("expected literal, got {other:?}"),
        }
        match parse_expr_str("'hA") {
            Expr::Literal { kind, width, .. } => {
                assert_eq!(kind, LiteralKind::Unsized);
                assert_eq!(width, None);
            }
            other => panic!("expected literal, got {other:?}"),
        }
        match parse_expr_str("'0") {
            Expr::Literal { kind, value, .. } => {
                assert_eq!(kind, LiteralKind::Fill);
                assert_eq!(value, Some(0));
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn precedence_add_mul() {
        match parse_expr_str("a + b * c") {
            Expr::Binary { op, rhs, .. } => {
                assert_eq!(op, BinaryOp::Add);
                assert!(matches!(
                    *rhs,
                    Expr::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn bitwise_and_binds_tighter_than_or() {
        match parse_expr_str("a == 1 & b | c") {
            Expr::Binary { op, lhs, .. } => {
                assert_eq!(op, BinaryOp::BitOr);
                match *lhs {
                    Expr::Binary { op, lhs, .. } => {
                        assert_eq!(op, BinaryOp::BitAnd);
                        assert!(matches!(
                            *lhs,
                            Expr::Binary {
                                op: BinaryOp::Eq,
                                ..
                            }
                        ));
                    }
                    other => panic!("expected binary, got {other:?}"),
                }
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn power_right_associative() {
        match parse_expr_str("a ** b ** c") {
            Expr::Binary { op, lhs, rhs, .. } => {
                assert_eq!(op, BinaryOp::Pow);
                assert!(matches!(*lhs, Expr::Name { .. }));
                assert!(matches!(
                    *rhs,
                    Expr::Binary {
                        op: BinaryOp::Pow,
                        ..
                    }
                ));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn operator_span_points_at_operator() {
        match parse_expr_str("ab & cd") {
            Expr::Binary { op_span, span, .. } => {
                assert_eq!((op_span.start, op_span.end), (3, 4));
                assert_eq!((span.start, span.end), (0, 7));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn ternary_expression() {
        assert!(matches!(
            parse_expr_str("sel ? a : b"),
            Expr::Ternary { .. }
        ));
    }

    #[test]
    fn reduction_and_logical_not() {
        match parse_expr_str("!valid") {
            Expr::Unary { op, .. } => assert_eq!(op, UnaryOp::LogNot),
            other => panic!("expected unary, got {other:?}"),
        }
        match parse_expr_str("|req") {
            Expr::Unary { op, .. } => assert!(op.is_reduction()),
            other => panic!("expected unary, got {other:?}"),
        }
    }

    #[test]
    fn selects_attach_to_names() {
        match parse_expr_str("data[7:0]") {
            Expr::Name { selects, .. } => {
                assert_eq!(selects.len(), 1);
                assert!(selects[0].is_part_select());
            }
            other => panic!("expected name, got {other:?}"),
        }
        match parse_expr_str("mem[i][3]") {
            Expr::Name { selects, .. } => {
                assert_eq!(selects.len(), 2);
                assert!(!selects[1].is_part_select());
            }
            other => panic!("expected name, got {other:?}"),
        }
        match parse_expr_str("bus.valid") {
            Expr::Name { selects, .. } => {
                assert!(matches!(selects[0], Select::Member { .. }));
            }
            other => panic!("expected name, got {other:?}"),
        }
    }

    #[test]
    fn indexed_part_selects() {
        match parse_expr_str("data[i*8 +: 8]") {
            Expr::Name { selects, .. } => match &selects[0] {
                Select::Indexed { ascending, .. } => assert!(*ascending),
                other => panic!("expected indexed select, got {other:?}"),
            },
            other => panic!("expected name, got {other:?}"),
        }
        match parse_expr_str("data[15 -: 4]") {
            Expr::Name { selects, .. } => {
                assert!(matches!(
                    selects[0],
                    Select::Indexed {
                        ascending: false,
                        ..
                    }
                ));
            }
            other => panic!("expected name, got {other:?}"),
        }
    }

    #[test]
    fn select_with_low_precedence_index() {
        match parse_expr_str("data[i << 1]") {
            Expr::Name { selects, .. } => match &selects[0] {
                Select::Bit { index, .. } => assert!(matches!(
                    index,
                    Expr::Binary {
                        op: BinaryOp::Shl,
                        ..
                    }
                )),
                other => panic!("expected bit select, got {other:?}"),
            },
            other => panic!("expected name, got {other:?}"),
        }
        match parse_expr_str("data[W-1:0]") {
            Expr::Name { selects, .. } => {
                assert!(matches!(selects[0], Select::Range { .. }))
            }
            other => panic!("expected name, got {other:?}"),
        }
    }

    #[test]
    fn concat_and_replicate() {
        match parse_expr_str("{a, b, 2'b00}") {
            Expr::Concat { elements, .. } => assert_eq!(elements.len(), 3),
            other => panic!("expected concat, got {other:?}"),
        }
        match parse_expr_str("{4{x, y}}") {
            Expr::Replicate { elements, .. } => assert_eq!(elements.len(), 2),
            other => panic!("expected replicate, got {other:?}"),
        }
    }

    #[test]
    fn calls_and_scoped_names() {
        parse_with("$clog2(DEPTH)", 0, |e, i| match e {
            Expr::Call {
                name, system, args, ..
            } => {
                assert!(*system);
                assert_eq!(i.resolve(*name), "$clog2");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected call, got {other:?}"),
        });
        parse_with("pkg::IDLE", 0, |e, i| match e {
            Expr::Name {
                name, qualified, ..
            } => {
                assert!(*qualified);
                assert_eq!(i.resolve(*name), "IDLE");
            }
            other => panic!("expected name, got {other:?}"),
        });
        assert!(matches!(parse_expr_str("f(a, b)"), Expr::Call { system: false, .. }));
    }

    #[test]
    fn inside_and_casts() {
        match parse_expr_str("op inside {ADD, [4:7]}") {
            Expr::Inside { set, .. } => {
                assert_eq!(set.len(), 2);
                assert!(matches!(set[1], Expr::Opaque(_)));
            }
            other => panic!("expected inside, got {other:?}"),
        }
        assert!(matches!(parse_expr_str("WIDTH'(x)"), Expr::Cast { .. }));
        assert!(matches!(parse_expr_str("signed'(x)"), Expr::Cast { .. }));
        assert!(matches!(parse_expr_str("'{default: '0}"), Expr::Opaque(_)));
        assert!(matches!(parse_expr_str("{<<{data}}"), Expr::Opaque(_)));
    }

    #[test]
    fn macro_use_is_opaque() {
        assert!(matches!(parse_expr_str("`WIDTH"), Expr::Opaque(_)));
        match parse_expr_str("`MAX(a, b) + 1") {
            Expr::Binary { lhs, .. } => assert!(matches!(*lhs, Expr::Opaque(_))),
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn event_binding_power_stops_at_pipes() {
        // `|` and `||` separate events in a sensitivity list.
        parse_with("clk | rst", 6, |e, i| {
            assert_eq!(i.resolve(e.as_plain_name().unwrap()), "clk");
        });
        parse_with("a ^ b", 6, |e, _| {
            assert!(matches!(
                e,
                Expr::Binary {
                    op: BinaryOp::BitXor,
                    ..
                }
            ));
        });
    }

    #[test]
    fn for_each_name_visits_nested_names() {
        parse_with("a[i] + f(b) ? {c, d} : e", 0, |e, i| {
            let mut names = Vec::new();
            e.for_each_name(&mut |n, _| names.push(i.resolve(n).to_string()));
            assert_eq!(names, ["a", "i", "b", "c", "d", "e"]);
        });
    }

    #[test]
    fn strip_parens_looks_through() {
        parse_with("((rst_n))", 0, |e, i| {
            assert!(matches!(e, Expr::Paren { .. }));
            assert_eq!(i.resolve(e.as_plain_name().unwrap()), "rst_n");
        });
    }

    #[test]
    fn errors_name_the_found_token() {
        let err = parse_err("a + ;");
        assert_eq!(err.message, "expected expression, found `;`");
        assert_eq!((err.line, err.column), (1, 5));
        let err = parse_err("{}");
        assert_eq!(err.message, "empty concatenation");
    }
}
