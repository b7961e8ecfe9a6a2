//! Core parser infrastructure and top-level parsing rules.
//!
//! `SvParser` walks the significant tokens of a file (trivia, error tokens,
//! and whole-line compiler directives removed) and builds one
//! [`ModuleTree`] per module. Structural errors are collected instead of
//! aborting: a malformed header drops its module, a malformed item drops
//! that item, and parsing resumes at the next `module`, `endmodule`, or
//! `always*` keyword.

use crate::error::ParseError;
use crate::token::{is_line_directive, SvToken, Token};
use crate::tree::*;
use svstyle_common::{Ident, Interner};
use svstyle_source::Span;

/// The result of parsing one file.
#[derive(Debug)]
pub struct ParseOutput {
    /// Successfully parsed modules, in source order.
    pub modules: Vec<ModuleTree>,
    /// Structural errors, in the order they were found.
    pub errors: Vec<ParseError>,
    /// Top-level regions kept as raw spans: directives, interfaces,
    /// packages, classes, and anything between modules.
    pub opaque: Vec<Span>,
}

/// Parses a token stream produced by the lexer into module trees.
///
/// `tokens` must have been lexed from `source`. Identifiers are interned in
/// `interner`.
pub fn parse(tokens: &[Token], source: &str, interner: &Interner) -> ParseOutput {
    let mut parser = SvParser::new(tokens, source, interner);
    let modules = parser.parse_source();
    tracing::trace!(
        modules = modules.len(),
        errors = parser.errors.len(),
        "parsed token stream"
    );
    ParseOutput {
        modules,
        errors: parser.errors,
        opaque: parser.opaque,
    }
}

struct ModuleHeader {
    name: Ident,
    name_span: Span,
    imports: Vec<Import>,
    params: Vec<SignalDecl>,
    port_style: PortStyle,
    ports: Vec<Port>,
}

/// A recursive descent parser over the significant tokens of one file.
pub struct SvParser<'src> {
    tokens: &'src [Token],
    /// Indices into `tokens` of the tokens the grammar looks at.
    sig: Vec<usize>,
    pos: usize,
    source: &'src str,
    eof: Token,
    pub(crate) interner: &'src Interner,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) opaque: Vec<Span>,
    /// Enum types of the module being parsed.
    pub(crate) enums: Vec<EnumType>,
    /// Names declared inside the procedure or function being parsed.
    pub(crate) locals: Vec<Ident>,
    /// The construct that assignments are currently nested in.
    pub(crate) context: BlockParent,
}

impl<'src> SvParser<'src> {
    /// Creates a parser over `tokens`, which must have been lexed from `source`.
    pub fn new(tokens: &'src [Token], source: &'src str, interner: &'src Interner) -> Self {
        let mut sig = Vec::with_capacity(tokens.len());
        let mut opaque = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let tok = &tokens[i];
            match tok.kind {
                SvToken::Eof => break,
                kind if kind.is_trivia() || kind == SvToken::Error => {}
                SvToken::Directive if is_line_directive(&tok.text(source)[1..]) => {
                    // The directive owns the rest of its line, continuations included.
                    let mut end = tok.span;
                    let mut j = i + 1;
                    while j < tokens.len() {
                        let next = &tokens[j];
                        let continued = tokens[j - 1].kind == SvToken::LineContinuation;
                        if next.kind == SvToken::Eof || (next.kind == SvToken::Newline && !continued)
                        {
                            break;
                        }
                        end = next.span;
                        j += 1;
                    }
                    opaque.push(tok.span.merge(end));
                    i = j;
                    continue;
                }
                _ => sig.push(i),
            }
            i += 1;
        }

        let eof = match tokens.last() {
            Some(last) if last.kind == SvToken::Eof => *last,
            Some(last) => Token {
                kind: SvToken::Eof,
                span: Span::new(last.span.file, last.span.end, last.span.end),
                line: last.line,
                column: last.column,
            },
            None => Token {
                kind: SvToken::Eof,
                span: Span::DUMMY,
                line: 1,
                column: 1,
            },
        };

        Self {
            tokens,
            sig,
            pos: 0,
            source,
            eof,
            interner,
            errors: Vec::new(),
            opaque,
            enums: Vec::new(),
            locals: Vec::new(),
            context: BlockParent::Module,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    /// Returns the current token.
    pub(crate) fn token(&self) -> &Token {
        self.sig
            .get(self.pos)
            .map_or(&self.eof, |&index| &self.tokens[index])
    }

    /// Returns the kind of the current token.
    pub(crate) fn current(&self) -> SvToken {
        self.token().kind
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.token().span
    }

    /// Returns the source text of the current token.
    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or("")
    }

    /// Returns `true` if the current token matches the given kind.
    pub(crate) fn at(&self, kind: SvToken) -> bool {
        self.current() == kind
    }

    /// Returns `true` if the parser is at end of file.
    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.sig.len()
    }

    /// Returns the span of the previous significant token.
    pub(crate) fn prev_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|p| self.sig.get(p)) {
            Some(&index) => self.tokens[index].span,
            None => self.current_span(),
        }
    }

    /// Advances past the current token.
    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches the given kind. Returns `true` if consumed.
    pub(crate) fn eat(&mut self, kind: SvToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind and returns its span, or fails
    /// with "expected {what}".
    pub(crate) fn expect(&mut self, kind: SvToken, what: &str) -> Result<Span, ParseError> {
        if self.at(kind) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.expected(what))
        }
    }

    /// Consumes an identifier and returns it interned with its span.
    pub(crate) fn expect_ident(&mut self) -> Result<(Ident, Span), ParseError> {
        if self.current().is_identifier() {
            let ident = self.interner.get_or_intern(self.current_text());
            let span = self.current_span();
            self.advance();
            Ok((ident, span))
        } else {
            Err(self.expected("identifier"))
        }
    }

    /// Returns the kind of the token at pos+offset.
    pub(crate) fn peek_kind(&self, offset: usize) -> SvToken {
        self.sig
            .get(self.pos + offset)
            .map_or(SvToken::Eof, |&index| self.tokens[index].kind)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Builds an error at the current token.
    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        Self::error_at(self.token(), message)
    }

    /// Builds an error at the given token.
    pub(crate) fn error_at(token: &Token, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            span: token.span,
            line: token.line,
            column: token.column,
        }
    }

    /// Builds an "expected X, found Y" error at the current token.
    pub(crate) fn expected(&self, what: &str) -> ParseError {
        let found = if self.at_eof() {
            "end of file".to_string()
        } else {
            format!("`{}`", self.current_text())
        };
        self.error_here(format!("expected {what}, found {found}"))
    }

    // ========================================================================
    // Skipping
    // ========================================================================

    /// Skips a balanced `(...)`, `[...]`, or `{...}` group starting at the
    /// current token. Does nothing if the current token does not open a group.
    pub(crate) fn skip_group(&mut self) {
        if !is_open(self.current()) {
            return;
        }
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.current();
            self.advance();
            if is_open(kind) {
                depth += 1;
            } else if is_close(kind) {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
    }

    /// Skips to and past the next `;` outside any bracket group. Stops
    /// without consuming at `endmodule` or end of file.
    pub(crate) fn skip_to_semicolon(&mut self) {
        loop {
            match self.current() {
                SvToken::Eof | SvToken::Endmodule => return,
                SvToken::Semicolon => {
                    self.advance();
                    return;
                }
                kind if is_open(kind) => self.skip_group(),
                _ => self.advance(),
            }
        }
    }

    /// Skips from an opening keyword to its matching closing keyword,
    /// honoring nesting, then an optional `: label`. Stops without consuming
    /// at `endmodule` when that is not the closing keyword.
    pub(crate) fn skip_block(&mut self, open: SvToken, close: SvToken) {
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.current();
            if kind == SvToken::Endmodule && close != SvToken::Endmodule {
                return;
            }
            self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.eat_end_label();
                    return;
                }
            }
        }
    }

    /// Skips one statement or generate construct without building a tree.
    pub(crate) fn skip_statement(&mut self) {
        match self.current() {
            SvToken::Begin => self.skip_block(SvToken::Begin, SvToken::End),
            SvToken::Fork => self.skip_fork(),
            SvToken::Generate => self.skip_block(SvToken::Generate, SvToken::Endgenerate),
            SvToken::Case | SvToken::Casez | SvToken::Casex => {
                // Nested case statements all close with `endcase`.
                let mut depth = 0usize;
                while !self.at_eof() && !self.at(SvToken::Endmodule) {
                    let kind = self.current();
                    self.advance();
                    if matches!(kind, SvToken::Case | SvToken::Casez | SvToken::Casex) {
                        depth += 1;
                    } else if kind == SvToken::Endcase {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                }
            }
            SvToken::If => {
                self.advance();
                self.skip_group();
                self.skip_statement();
                if self.eat(SvToken::Else) {
                    self.skip_statement();
                }
            }
            SvToken::For | SvToken::Foreach | SvToken::While | SvToken::Repeat => {
                self.advance();
                self.skip_group();
                self.skip_statement();
            }
            SvToken::Forever | SvToken::Unique | SvToken::Unique0 | SvToken::Priority => {
                self.advance();
                self.skip_statement();
            }
            SvToken::Hash => {
                self.skip_delay();
                self.skip_statement();
            }
            SvToken::At => {
                self.advance();
                if self.at(SvToken::LeftParen) {
                    self.skip_group();
                } else {
                    self.advance();
                }
                self.skip_statement();
            }
            SvToken::Identifier if self.peek_kind(1) == SvToken::Colon => {
                self.advance();
                self.advance();
                self.skip_statement();
            }
            _ => self.skip_to_semicolon(),
        }
    }

    /// Skips `fork ... join`, `join_any`, or `join_none`.
    pub(crate) fn skip_fork(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() && !self.at(SvToken::Endmodule) {
            let kind = self.current();
            self.advance();
            match kind {
                SvToken::Fork => depth += 1,
                SvToken::Join | SvToken::JoinAny | SvToken::JoinNone => {
                    depth -= 1;
                    if depth == 0 {
                        self.eat_end_label();
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// Skips a delay control: `#5`, `#1ns`, `#(A + B)`, or `#DELAY`.
    pub(crate) fn skip_delay(&mut self) {
        self.advance();
        if self.at(SvToken::LeftParen) {
            self.skip_group();
        } else {
            self.advance();
        }
    }

    /// Skips a macro use with its argument list and an optional `;`, and
    /// returns its span.
    pub(crate) fn skip_macro_use(&mut self) -> Span {
        let start = self.current_span();
        self.advance();
        if self.at(SvToken::LeftParen) {
            self.skip_group();
        }
        self.eat(SvToken::Semicolon);
        start.merge(self.prev_span())
    }

    /// Consumes a `: label` after an end keyword.
    pub(crate) fn eat_end_label(&mut self) {
        if self.at(SvToken::Colon) && self.peek_kind(1).is_identifier() {
            self.advance();
            self.advance();
        }
    }

    /// Skips to the next point where module-item parsing can resume.
    fn sync_item(&mut self) {
        while !self.at_eof()
            && !matches!(self.current(), SvToken::Module | SvToken::Endmodule)
            && !self.current().is_always_variant()
        {
            self.advance();
        }
    }

    /// Skips a module whose header failed to parse.
    fn recover_module(&mut self) {
        while !self.at_eof() && !self.at(SvToken::Module) {
            if self.eat(SvToken::Endmodule) {
                self.eat_end_label();
                return;
            }
            self.advance();
        }
    }

    // ========================================================================
    // Top-level parsing
    // ========================================================================

    /// Parses every module in the file.
    pub(crate) fn parse_source(&mut self) -> Vec<ModuleTree> {
        let mut modules = Vec::new();
        let mut pending_imports = Vec::new();

        while !self.at_eof() {
            let start = self.current_span();
            match self.current() {
                SvToken::Module => match self.parse_module() {
                    Some(mut module) => {
                        let mut imports = std::mem::take(&mut pending_imports);
                        imports.append(&mut module.imports);
                        module.imports = imports;
                        modules.push(module);
                    }
                    None => pending_imports.clear(),
                },
                SvToken::Import => match self.parse_import() {
                    Ok(mut imports) => pending_imports.append(&mut imports),
                    Err(err) => {
                        self.errors.push(err);
                        self.skip_to_semicolon();
                    }
                },
                SvToken::Interface => self.skip_top_level(SvToken::Interface, SvToken::Endinterface),
                SvToken::Package => self.skip_top_level(SvToken::Package, SvToken::Endpackage),
                SvToken::Class => self.skip_top_level(SvToken::Class, SvToken::Endclass),
                SvToken::Program => self.skip_top_level(SvToken::Program, SvToken::Endprogram),
                SvToken::Directive => {
                    let span = self.skip_macro_use();
                    self.opaque.push(span);
                }
                SvToken::Semicolon => self.advance(),
                SvToken::Endmodule => {
                    let err = self.error_here("`endmodule` without a matching `module`");
                    self.errors.push(err);
                    self.advance();
                }
                _ => {
                    // Compilation-unit items: typedefs, functions, parameters.
                    self.advance();
                    while !self.at_eof()
                        && !matches!(
                            self.current(),
                            SvToken::Module
                                | SvToken::Interface
                                | SvToken::Package
                                | SvToken::Class
                                | SvToken::Program
                                | SvToken::Import
                        )
                    {
                        self.advance();
                    }
                    self.opaque.push(start.merge(self.prev_span()));
                }
            }
        }
        modules
    }

    fn skip_top_level(&mut self, open: SvToken, close: SvToken) {
        let start = self.current_span();
        self.skip_block(open, close);
        self.opaque.push(start.merge(self.prev_span()));
    }

    /// Parses `module ... endmodule`. Returns `None` when the header is
    /// malformed; the error is recorded and the module skipped.
    fn parse_module(&mut self) -> Option<ModuleTree> {
        let keyword = *self.token();
        self.advance();
        self.enums.clear();

        let header = match self.parse_module_header() {
            Ok(header) => header,
            Err(err) => {
                tracing::debug!(%err, "dropping module with malformed header");
                self.errors.push(err);
                self.recover_module();
                return None;
            }
        };

        let mut module = ModuleTree {
            name: header.name,
            name_span: header.name_span,
            span: keyword.span,
            imports: header.imports,
            port_style: header.port_style,
            ports: header.ports,
            params: header.params,
            decls: Vec::new(),
            enums: Vec::new(),
            assigns: Vec::new(),
            procedures: Vec::new(),
            functions: Vec::new(),
            opaque: Vec::new(),
        };

        loop {
            match self.current() {
                SvToken::Endmodule => {
                    self.advance();
                    self.eat_end_label();
                    break;
                }
                SvToken::Eof | SvToken::Module => {
                    let name = self.interner.resolve(module.name).to_string();
                    let err = self.expected(&format!("`endmodule` for module `{name}`"));
                    self.errors.push(err);
                    break;
                }
                _ => {
                    let before = self.pos;
                    if let Err(err) = self.parse_module_item(&mut module) {
                        tracing::debug!(%err, "skipping malformed module item");
                        self.errors.push(err);
                        if self.pos == before {
                            self.advance();
                        }
                        self.sync_item();
                    }
                }
            }
        }

        module.enums = std::mem::take(&mut self.enums);
        module.span = keyword.span.merge(self.prev_span());
        Some(module)
    }

    /// Parses `[automatic] name [imports] [#(params)] [(ports)] ;`.
    fn parse_module_header(&mut self) -> Result<ModuleHeader, ParseError> {
        if matches!(self.current(), SvToken::Automatic | SvToken::Static) {
            self.advance();
        }
        let (name, name_span) = match self.expect_ident() {
            Ok(name) => name,
            Err(_) => return Err(self.expected("module name")),
        };

        let mut imports = Vec::new();
        while self.at(SvToken::Import) {
            imports.extend(self.parse_import()?);
        }

        let params = if self.eat(SvToken::Hash) {
            self.parse_param_port_list()?
        } else {
            Vec::new()
        };

        let (port_style, ports) = if self.at(SvToken::LeftParen) {
            self.parse_port_list()?
        } else {
            (PortStyle::None, Vec::new())
        };

        self.expect(SvToken::Semicolon, "`;` after module header")?;

        Ok(ModuleHeader {
            name,
            name_span,
            imports,
            params,
            port_style,
            ports,
        })
    }

    /// Parses one module item into `module`.
    fn parse_module_item(&mut self, module: &mut ModuleTree) -> Result<(), ParseError> {
        let start = self.current_span();
        match self.current() {
            kind if kind.is_direction() => {
                for decl in self.parse_port_declaration()? {
                    module.ports.push(Port { decl });
                }
            }
            SvToken::Parameter | SvToken::Localparam => {
                module.params.extend(self.parse_param_declaration()?);
            }
            SvToken::Typedef if self.peek_kind(1) == SvToken::Enum => {
                self.parse_typedef_enum()?;
            }
            SvToken::Assign => module.assigns.extend(self.parse_continuous_assign()?),
            kind if kind.is_always_variant() => {
                let procedure = self.parse_procedure()?;
                module.procedures.push(procedure);
            }
            SvToken::Function => {
                let function = self.parse_function()?;
                module.functions.push(function);
            }
            SvToken::Import => module.imports.extend(self.parse_import()?),
            SvToken::Semicolon => self.advance(),
            SvToken::Directive => {
                let span = self.skip_macro_use();
                module.opaque.push(span);
            }
            SvToken::End
            | SvToken::Endcase
            | SvToken::Else
            | SvToken::Endfunction
            | SvToken::Endtask
            | SvToken::Endgenerate => {
                return Err(self.error_here(format!("unexpected `{}`", self.current_text())));
            }
            _ if self.at_signal_declaration() => {
                for decl in self.parse_signal_declaration()? {
                    declare_signal(module, decl);
                }
            }
            kind => {
                match kind {
                    SvToken::Task => self.skip_block(SvToken::Task, SvToken::Endtask),
                    SvToken::Generate => self.skip_block(SvToken::Generate, SvToken::Endgenerate),
                    SvToken::Property => self.skip_block(SvToken::Property, SvToken::Endproperty),
                    SvToken::Sequence => self.skip_block(SvToken::Sequence, SvToken::Endsequence),
                    SvToken::Clocking => self.skip_block(SvToken::Clocking, SvToken::Endclocking),
                    SvToken::Covergroup => self.skip_block(SvToken::Covergroup, SvToken::Endgroup),
                    SvToken::Initial | SvToken::Final => {
                        self.advance();
                        self.skip_statement();
                    }
                    // Bare generate constructs and labeled items.
                    SvToken::If
                    | SvToken::For
                    | SvToken::Case
                    | SvToken::Casez
                    | SvToken::Casex
                    | SvToken::Begin => self.skip_statement(),
                    SvToken::Identifier if self.peek_kind(1) == SvToken::Colon => {
                        self.skip_statement()
                    }
                    // Typedefs other than enums, genvars, assertions,
                    // instantiations, and anything else up to its `;`.
                    _ => self.skip_to_semicolon(),
                }
                module.opaque.push(start.merge(self.prev_span()));
            }
        }
        Ok(())
    }
}

/// Adds a body declaration to `module`. A Verilog-style `reg x_o;` that
/// repeats a non-ANSI port only fills in the port's type.
fn declare_signal(module: &mut ModuleTree, decl: SignalDecl) {
    if let Some(port) = module
        .ports
        .iter_mut()
        .find(|p| p.decl.name == decl.name && p.decl.data_type == DataType::Implicit)
    {
        port.decl.data_type = decl.data_type;
        if port.decl.packed.is_empty() {
            port.decl.packed = decl.packed;
        }
        return;
    }
    module.decls.push(decl);
}

fn is_open(kind: SvToken) -> bool {
    matches!(
        kind,
        SvToken::LeftParen | SvToken::LeftBracket | SvToken::LeftBrace
    )
}

fn is_close(kind: SvToken) -> bool {
    matches!(
        kind,
        SvToken::RightParen | SvToken::RightBracket | SvToken::RightBrace
    )
}
