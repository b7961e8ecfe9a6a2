//! Declaration parsing: imports, parameter and port lists, port, parameter,
//! and signal declarations, data types, and enumerations.

use crate::error::ParseError;
use crate::expr::Expr;
use crate::parser::SvParser;
use crate::token::SvToken;
use crate::tree::*;
use svstyle_common::Ident;
use svstyle_source::Span;

/// The type part of a declaration: everything before the first name.
#[derive(Clone, Debug)]
pub(crate) struct TypeHead {
    pub(crate) data_type: DataType,
    pub(crate) type_span: Option<Span>,
    pub(crate) signed: bool,
    pub(crate) packed: Vec<PackedRange>,
    pub(crate) dims_span: Option<Span>,
}

impl TypeHead {
    /// Whether the declaration spelled any type information at all.
    fn is_written(&self) -> bool {
        self.type_span.is_some() || self.signed || !self.packed.is_empty()
    }

    /// The same type for a later name in the list; it owns no tokens.
    fn continued(&self) -> TypeHead {
        TypeHead {
            type_span: None,
            dims_span: None,
            ..self.clone()
        }
    }

    fn declare(&self, d: Declarator, class: SignalClass, lead_span: Option<Span>) -> SignalDecl {
        SignalDecl {
            name: d.name,
            name_span: d.name_span,
            class,
            data_type: self.data_type,
            signed: self.signed,
            packed: self.packed.clone(),
            unpacked: d.unpacked,
            init: d.init,
            lead_span,
            type_span: self.type_span,
            dims_span: self.dims_span,
            span: d.span,
        }
    }
}

/// One declared name with its unpacked dimensions and initializer.
struct Declarator {
    name: Ident,
    name_span: Span,
    unpacked: usize,
    init: Option<Expr>,
    span: Span,
}

fn builtin_type(kind: SvToken) -> DataType {
    match kind {
        SvToken::Logic => DataType::Logic,
        SvToken::Wire => DataType::Wire,
        SvToken::Reg => DataType::Reg,
        SvToken::Bit => DataType::Bit,
        SvToken::Byte => DataType::Byte,
        SvToken::Shortint => DataType::Shortint,
        SvToken::Int => DataType::Int,
        SvToken::Longint => DataType::Longint,
        SvToken::Integer => DataType::Integer,
        SvToken::Real => DataType::Real,
        _ => DataType::Tri,
    }
}

fn direction_of(kind: SvToken) -> Direction {
    match kind {
        SvToken::Input => Direction::Input,
        SvToken::Output => Direction::Output,
        _ => Direction::Inout,
    }
}

impl SvParser<'_> {
    /// Parses `import pkg::item, pkg::*;`. DPI imports are skipped.
    pub(crate) fn parse_import(&mut self) -> Result<Vec<Import>, ParseError> {
        self.advance();
        if self.at(SvToken::StringLiteral) {
            self.skip_to_semicolon();
            return Ok(Vec::new());
        }
        let mut imports = Vec::new();
        loop {
            let start = self.current_span();
            let (package, _) = self.expect_ident()?;
            self.expect(SvToken::ColonColon, "`::` in import")?;
            let item = if self.eat(SvToken::Star) {
                None
            } else {
                Some(self.expect_ident()?.0)
            };
            imports.push(Import {
                package,
                item,
                span: start.merge(self.prev_span()),
            });
            if !self.eat(SvToken::Comma) {
                break;
            }
        }
        self.expect(SvToken::Semicolon, "`;` after import")?;
        Ok(imports)
    }

    /// Parses the `( ... )` after `#` in a module header.
    pub(crate) fn parse_param_port_list(&mut self) -> Result<Vec<SignalDecl>, ParseError> {
        self.expect(SvToken::LeftParen, "`(` after `#`")?;
        let mut params = Vec::new();
        if self.eat(SvToken::RightParen) {
            return Ok(params);
        }
        let mut class = SignalClass::Parameter;
        loop {
            let start = self.current_span();
            let mut lead = None;
            match self.current() {
                SvToken::Parameter => class = SignalClass::Parameter,
                SvToken::Localparam => class = SignalClass::Localparam,
                _ => {}
            }
            if matches!(self.current(), SvToken::Parameter | SvToken::Localparam) {
                lead = Some(start);
                self.advance();
            }
            if self.eat(SvToken::Type) {
                self.skip_list_entry();
            } else {
                let head = self.parse_data_type()?;
                let declarator = self.parse_declarator(start)?;
                let lead = lead.or(head.type_span);
                params.push(head.declare(declarator, class, lead));
            }
            if !self.eat(SvToken::Comma) {
                break;
            }
        }
        self.expect(SvToken::RightParen, "`)` to close the parameter list")?;
        Ok(params)
    }

    /// Parses the port list of a module header.
    ///
    /// ANSI entries inherit direction and type from the previous entry when
    /// they spell neither; a first entry without a direction is `inout`.
    /// Interface ports are skipped.
    pub(crate) fn parse_port_list(&mut self) -> Result<(PortStyle, Vec<Port>), ParseError> {
        self.expect(SvToken::LeftParen, "`(`")?;
        if self.eat(SvToken::RightParen) {
            return Ok((PortStyle::None, Vec::new()));
        }

        let non_ansi = match self.current() {
            kind if kind.is_identifier() => {
                matches!(self.peek_kind(1), SvToken::Comma | SvToken::RightParen)
            }
            SvToken::Dot | SvToken::LeftBrace => true,
            _ => false,
        };
        if non_ansi {
            while !self.at(SvToken::RightParen) {
                if self.at_eof() || self.at(SvToken::Semicolon) {
                    return Err(self.expected("`)` to close the port list"));
                }
                if matches!(self.current(), SvToken::LeftParen | SvToken::LeftBrace | SvToken::LeftBracket) {
                    self.skip_group();
                } else {
                    self.advance();
                }
            }
            self.advance();
            return Ok((PortStyle::NonAnsi, Vec::new()));
        }

        let mut ports = Vec::new();
        let mut prev: Option<(Direction, TypeHead)> = None;
        loop {
            let start = self.current_span();
            let direction = match self.current() {
                kind if kind.is_direction() => Some((direction_of(kind), start)),
                SvToken::Ref => Some((Direction::Inout, start)),
                _ => None,
            };
            if direction.is_some() {
                self.advance();
            }

            if direction.is_none() && self.at_interface_port(prev.is_none()) {
                self.skip_list_entry();
                prev = None;
            } else {
                let head = self.parse_data_type()?;
                let declarator = self.parse_declarator(start)?;
                let written = head.is_written();
                let type_lead = head.type_span;
                let (dir, head, lead) = match (direction, prev.as_ref()) {
                    (Some((dir, span)), _) => (dir, head, Some(span)),
                    (None, Some((dir, prev_head))) if !written => {
                        (*dir, prev_head.continued(), None)
                    }
                    (None, Some((dir, _))) => (*dir, head, type_lead),
                    (None, None) => (Direction::Inout, head, type_lead),
                };
                ports.push(Port {
                    decl: head.declare(declarator, SignalClass::Port(dir), lead),
                });
                prev = Some((dir, head));
            }

            if !self.eat(SvToken::Comma) {
                break;
            }
        }
        self.expect(SvToken::RightParen, "`)` to close the port list")?;
        Ok((PortStyle::Ansi, ports))
    }

    fn at_interface_port(&self, first: bool) -> bool {
        self.at(SvToken::Interface)
            || (self.current().is_identifier() && self.peek_kind(1) == SvToken::Dot)
            || (first && self.at_user_type())
    }

    /// Skips one entry of a parenthesized list, stopping before `,` or `)`.
    fn skip_list_entry(&mut self) {
        loop {
            match self.current() {
                SvToken::Comma | SvToken::RightParen | SvToken::Semicolon | SvToken::Eof => return,
                SvToken::LeftParen | SvToken::LeftBracket | SvToken::LeftBrace => self.skip_group(),
                _ => self.advance(),
            }
        }
    }

    /// Parses a body port declaration: `input logic [7:0] a_i, b_i;`.
    pub(crate) fn parse_port_declaration(&mut self) -> Result<Vec<SignalDecl>, ParseError> {
        let lead = self.current_span();
        let direction = direction_of(self.current());
        self.advance();
        let head = self.parse_data_type()?;
        self.parse_declarator_list(head, SignalClass::Port(direction), lead)
    }

    /// Parses `parameter`/`localparam` declarations in a module body.
    pub(crate) fn parse_param_declaration(&mut self) -> Result<Vec<SignalDecl>, ParseError> {
        let lead = self.current_span();
        let class = if self.at(SvToken::Parameter) {
            SignalClass::Parameter
        } else {
            SignalClass::Localparam
        };
        self.advance();
        if self.eat(SvToken::Type) {
            self.skip_to_semicolon();
            return Ok(Vec::new());
        }
        let head = self.parse_data_type()?;
        self.parse_declarator_list(head, class, lead)
    }

    /// Returns `true` if the current token starts a signal declaration.
    pub(crate) fn at_signal_declaration(&self) -> bool {
        match self.current() {
            kind if kind.is_data_type() => true,
            SvToken::Var | SvToken::Const | SvToken::Enum | SvToken::Struct | SvToken::Union => {
                true
            }
            kind if kind.is_identifier() => self.user_type_name_offset().is_some_and(|name| {
                matches!(
                    self.peek_kind(name + 1),
                    SvToken::Semicolon | SvToken::Comma | SvToken::Equals | SvToken::LeftBracket
                )
            }),
            _ => false,
        }
    }

    /// Parses a signal declaration in a module body.
    pub(crate) fn parse_signal_declaration(&mut self) -> Result<Vec<SignalDecl>, ParseError> {
        let lead = self.current_span();
        let head = self.parse_data_type()?;
        self.parse_declarator_list(head, SignalClass::Internal, lead)
    }

    fn parse_declarator_list(
        &mut self,
        head: TypeHead,
        class: SignalClass,
        lead: Span,
    ) -> Result<Vec<SignalDecl>, ParseError> {
        let first = self.parse_declarator(lead)?;
        let mut decls = vec![head.declare(first, class, Some(lead))];
        let rest = head.continued();
        while self.eat(SvToken::Comma) {
            let start = self.current_span();
            let declarator = self.parse_declarator(start)?;
            decls.push(rest.declare(declarator, class, None));
        }
        self.expect(SvToken::Semicolon, "`;` after declaration")?;
        Ok(decls)
    }

    fn parse_declarator(&mut self, start: Span) -> Result<Declarator, ParseError> {
        let (name, name_span) = self.expect_ident()?;
        let unpacked = self.skip_unpacked_dims();
        let init = if self.eat(SvToken::Equals) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Declarator {
            name,
            name_span,
            unpacked,
            init,
            span: start.merge(self.prev_span()),
        })
    }

    /// Skips unpacked dimensions after a name and returns how many there were.
    pub(crate) fn skip_unpacked_dims(&mut self) -> usize {
        let mut count = 0;
        while self.at(SvToken::LeftBracket) {
            self.skip_group();
            count += 1;
        }
        count
    }

    /// Parses a data type: a built-in type keyword, `enum {...}`, a struct,
    /// or a (package-scoped) type name, then `signed`/`unsigned` and packed
    /// dimensions. Any part may be absent.
    pub(crate) fn parse_data_type(&mut self) -> Result<TypeHead, ParseError> {
        while matches!(self.current(), SvToken::Var | SvToken::Const) {
            self.advance();
        }
        let start = self.current_span();
        let mut data_type = DataType::Implicit;
        let mut type_span = None;
        match self.current() {
            kind if kind.is_data_type() => {
                data_type = builtin_type(kind);
                self.advance();
                // `wire logic`, `tri logic`
                if self.current().is_data_type() {
                    self.advance();
                }
                type_span = Some(start.merge(self.prev_span()));
            }
            SvToken::Enum => {
                data_type = DataType::Enum(self.parse_enum_body()?);
                type_span = Some(start.merge(self.prev_span()));
            }
            SvToken::Struct | SvToken::Union => {
                self.advance();
                while !self.at(SvToken::LeftBrace) {
                    if self.at_eof() || self.at(SvToken::Semicolon) {
                        return Err(self.expected("`{` in struct declaration"));
                    }
                    self.advance();
                }
                self.skip_group();
                type_span = Some(start.merge(self.prev_span()));
            }
            kind if kind.is_identifier() && self.at_user_type() => {
                let (mut name, _) = self.expect_ident()?;
                while self.eat(SvToken::ColonColon) {
                    name = self.expect_ident()?.0;
                }
                data_type = DataType::Named(name);
                type_span = Some(start.merge(self.prev_span()));
            }
            _ => {}
        }

        let signed = match self.current() {
            SvToken::Signed => {
                self.advance();
                true
            }
            SvToken::Unsigned => {
                self.advance();
                false
            }
            _ => false,
        };

        let mut packed = Vec::new();
        let mut dims_span: Option<Span> = None;
        while self.at(SvToken::LeftBracket) {
            let open = self.current_span();
            self.advance();
            let msb = self.parse_expr()?;
            let lsb = if self.eat(SvToken::Colon) {
                self.parse_expr()?
            } else {
                Expr::Opaque(self.current_span())
            };
            let close = self.expect(SvToken::RightBracket, "`]`")?;
            let span = open.merge(close);
            dims_span = Some(dims_span.map_or(span, |d| d.merge(span)));
            packed.push(PackedRange { msb, lsb, span });
        }

        Ok(TypeHead {
            data_type,
            type_span,
            signed,
            packed,
            dims_span,
        })
    }

    /// Returns `true` if the cursor is at a (possibly scoped) type name that
    /// is followed, after optional packed dimensions, by a declared name.
    pub(crate) fn at_user_type(&self) -> bool {
        self.user_type_name_offset().is_some()
    }

    /// The offset of the declared name after a user type name.
    fn user_type_name_offset(&self) -> Option<usize> {
        if !self.current().is_identifier() {
            return None;
        }
        let mut i = 1;
        while self.peek_kind(i) == SvToken::ColonColon && self.peek_kind(i + 1).is_identifier() {
            i += 2;
        }
        while self.peek_kind(i) == SvToken::LeftBracket {
            i = self.matching_close(i)? + 1;
        }
        self.peek_kind(i).is_identifier().then_some(i)
    }

    /// Finds the offset of the bracket closing the one at `offset`.
    fn matching_close(&self, offset: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = offset;
        loop {
            match self.peek_kind(i) {
                SvToken::Eof | SvToken::Semicolon => return None,
                SvToken::LeftParen | SvToken::LeftBracket | SvToken::LeftBrace => depth += 1,
                SvToken::RightParen | SvToken::RightBracket | SvToken::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Parses `enum [base] { A, B = 1, ... }`, records it in the current
    /// module, and returns its index.
    fn parse_enum_body(&mut self) -> Result<usize, ParseError> {
        let start = self.expect(SvToken::Enum, "`enum`")?;
        while !self.at(SvToken::LeftBrace) {
            if self.at_eof() || self.at(SvToken::Semicolon) {
                return Err(self.expected("`{` in enum declaration"));
            }
            if self.at(SvToken::LeftBracket) {
                self.skip_group();
            } else {
                self.advance();
            }
        }
        self.advance();

        let mut members = Vec::new();
        if !self.at(SvToken::RightBrace) {
            loop {
                let member = self.expect_ident()?;
                if self.at(SvToken::LeftBracket) {
                    self.skip_group();
                }
                if self.eat(SvToken::Equals) {
                    self.parse_expr()?;
                }
                members.push(member);
                if !self.eat(SvToken::Comma) {
                    break;
                }
            }
        }
        self.expect(SvToken::RightBrace, "`}` to close the enum")?;
        self.enums.push(EnumType {
            name: None,
            members,
            span: start.merge(self.prev_span()),
        });
        Ok(self.enums.len() - 1)
    }

    /// Parses `typedef enum ... { ... } name;`.
    pub(crate) fn parse_typedef_enum(&mut self) -> Result<(), ParseError> {
        let start = self.expect(SvToken::Typedef, "`typedef`")?;
        let index = self.parse_enum_body()?;
        let (name, _) = self.expect_ident()?;
        self.skip_unpacked_dims();
        self.expect(SvToken::Semicolon, "`;` after typedef")?;
        let span = start.merge(self.prev_span());
        if let Some(ty) = self.enums.get_mut(index) {
            ty.name = Some(name);
            ty.span = span;
        }
        Ok(())
    }
}
