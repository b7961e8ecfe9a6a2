//! Procedures, event controls, statements, functions, and continuous
//! assignments.

use crate::error::ParseError;
use crate::expr::Expr;
use crate::parser::SvParser;
use crate::token::SvToken;
use crate::tree::*;
use svstyle_source::Span;

/// Events bind tighter than `|` and `||` so those separate events.
const EVENT_BP: u8 = 6;

fn qualifier_of(kind: SvToken) -> Option<Qualifier> {
    match kind {
        SvToken::Unique => Some(Qualifier::Unique),
        SvToken::Unique0 => Some(Qualifier::Unique0),
        SvToken::Priority => Some(Qualifier::Priority),
        _ => None,
    }
}

/// Collects the signals written by an assignment target.
fn targets_of(lhs: &Expr, out: &mut Vec<Target>) {
    match lhs {
        Expr::Name {
            name,
            selects,
            span,
            ..
        } => out.push(Target {
            name: *name,
            span: *span,
            selected: !selects.is_empty(),
        }),
        Expr::Concat { elements, .. } => {
            for element in elements {
                targets_of(element, out);
            }
        }
        Expr::Paren { inner, .. } => targets_of(inner, out),
        _ => {}
    }
}

impl SvParser<'_> {
    /// Parses an `always*` procedure.
    ///
    /// An `always_ff` without an edge event records an error but the
    /// procedure is kept.
    pub(crate) fn parse_procedure(&mut self) -> Result<Procedure, ParseError> {
        let keyword = *self.token();
        let kind = match keyword.kind {
            SvToken::AlwaysComb => ProcKind::AlwaysComb,
            SvToken::AlwaysFf => ProcKind::AlwaysFf,
            SvToken::AlwaysLatch => ProcKind::AlwaysLatch,
            _ => ProcKind::Always,
        };
        self.advance();

        let sensitivity = if self.at(SvToken::At) {
            Some(self.parse_sensitivity()?)
        } else {
            None
        };
        if kind == ProcKind::AlwaysFf && !sensitivity.as_ref().is_some_and(Sensitivity::has_edge) {
            let err = Self::error_at(&keyword, "always_ff sensitivity list has no clock edge");
            tracing::debug!(%err, "keeping always_ff without clock edge");
            self.errors.push(err);
        }

        let parent = kind.block_parent();
        self.context = parent;
        self.locals.clear();
        let body = self.parse_branch(parent)?;

        Ok(Procedure {
            kind,
            keyword_span: keyword.span,
            sensitivity,
            body,
            locals: std::mem::take(&mut self.locals),
            span: keyword.span.merge(self.prev_span()),
        })
    }

    /// Parses `@*`, `@(*)`, `@name`, or `@( event {sep event} )`.
    fn parse_sensitivity(&mut self) -> Result<Sensitivity, ParseError> {
        let start = self.expect(SvToken::At, "`@`")?;
        let star = |parser: &Self| Sensitivity {
            events: Vec::new(),
            separators: Vec::new(),
            star: true,
            span: start.merge(parser.prev_span()),
        };
        if self.eat(SvToken::Star) {
            return Ok(star(self));
        }
        if !self.eat(SvToken::LeftParen) {
            let event = self.parse_event()?;
            return Ok(Sensitivity {
                events: vec![event],
                separators: Vec::new(),
                star: false,
                span: start.merge(self.prev_span()),
            });
        }
        if self.eat(SvToken::Star) {
            self.expect(SvToken::RightParen, "`)` after `@(*`")?;
            return Ok(star(self));
        }

        let mut events = vec![self.parse_event()?];
        let mut separators = Vec::new();
        loop {
            let kind = match self.current() {
                SvToken::Or => SeparatorKind::Or,
                SvToken::Comma => SeparatorKind::Comma,
                SvToken::Pipe => SeparatorKind::Pipe,
                SvToken::DoublePipe => SeparatorKind::DoublePipe,
                _ => break,
            };
            separators.push(Separator {
                kind,
                span: self.current_span(),
            });
            self.advance();
            events.push(self.parse_event()?);
        }
        self.expect(SvToken::RightParen, "`)` to close the event list")?;
        Ok(Sensitivity {
            events,
            separators,
            star: false,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_event(&mut self) -> Result<Event, ParseError> {
        let start = self.current_span();
        let edge = match self.current() {
            SvToken::Posedge => Some(Edge::Posedge),
            SvToken::Negedge => Some(Edge::Negedge),
            SvToken::Edge => Some(Edge::Both),
            _ => None,
        };
        if edge.is_some() {
            self.advance();
        }
        let expr = self.parse_expr_bp(EVENT_BP)?;
        if self.eat(SvToken::Iff) {
            self.parse_expr_bp(EVENT_BP)?;
        }
        let signal = expr.as_plain_name();
        Ok(Event {
            edge,
            expr,
            signal,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses `begin [: label] ... end [: label]`.
    fn parse_begin_block(&mut self, parent: BlockParent) -> Result<Block, ParseError> {
        let start = self.expect(SvToken::Begin, "`begin`")?;
        let label = if self.eat(SvToken::Colon) {
            Some(self.expect_ident()?.0)
        } else {
            None
        };
        let mut statements = Vec::new();
        loop {
            match self.current() {
                SvToken::End => {
                    self.advance();
                    self.eat_end_label();
                    break;
                }
                SvToken::Eof | SvToken::Endmodule => return Err(self.expected("`end`")),
                _ => statements.extend(self.parse_statement()?),
            }
        }
        Ok(Block {
            parent,
            delimited: true,
            label,
            statements,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses the body of a procedure, branch, case item, or loop: either a
    /// `begin`/`end` block or a single statement.
    fn parse_branch(&mut self, parent: BlockParent) -> Result<Block, ParseError> {
        if self.at(SvToken::Begin) {
            return self.parse_begin_block(parent);
        }
        let start = self.current_span();
        let statements = self.parse_statement()?.into_iter().collect();
        Ok(Block {
            parent,
            delimited: false,
            label: None,
            statements,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses one procedural statement. Returns `None` for a null statement.
    fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        let start = self.current_span();
        let stmt = match self.current() {
            SvToken::Semicolon => {
                self.advance();
                return Ok(None);
            }
            SvToken::Begin => Statement::Block(self.parse_begin_block(BlockParent::Bare)?),
            kind @ (SvToken::Unique | SvToken::Unique0 | SvToken::Priority) => {
                let qualifier = qualifier_of(kind);
                self.advance();
                match self.current() {
                    SvToken::If => Statement::If(self.parse_if(qualifier, start)?),
                    SvToken::Case | SvToken::Casez | SvToken::Casex => {
                        Statement::Case(self.parse_case(qualifier, start)?)
                    }
                    _ => return Err(self.expected("`if` or `case` after qualifier")),
                }
            }
            SvToken::If => Statement::If(self.parse_if(None, start)?),
            SvToken::Case | SvToken::Casez | SvToken::Casex => {
                Statement::Case(self.parse_case(None, start)?)
            }
            SvToken::For
            | SvToken::Foreach
            | SvToken::While
            | SvToken::Repeat
            | SvToken::Forever
            | SvToken::Do => Statement::Loop(self.parse_loop(start)?),
            SvToken::Hash => {
                self.skip_delay();
                return self.parse_statement();
            }
            SvToken::At => {
                self.parse_sensitivity()?;
                return self.parse_statement();
            }
            SvToken::Fork => {
                self.skip_fork();
                Statement::Other(start.merge(self.prev_span()))
            }
            SvToken::Directive => Statement::Other(self.skip_macro_use()),
            SvToken::Return
            | SvToken::Break
            | SvToken::Continue
            | SvToken::Disable
            | SvToken::Wait
            | SvToken::SystemIdentifier
            | SvToken::Assert
            | SvToken::Assume
            | SvToken::Cover
            | SvToken::Void
            | SvToken::PlusPlus
            | SvToken::MinusMinus
            | SvToken::Arrow => {
                self.skip_to_semicolon();
                Statement::Other(start.merge(self.prev_span()))
            }
            _ if self.at_local_declaration() => self.parse_local_declaration()?,
            kind if kind.is_identifier() && self.peek_kind(1) == SvToken::Colon => {
                self.advance();
                self.advance();
                return self.parse_statement();
            }
            kind if kind.is_identifier() || kind == SvToken::LeftBrace => {
                self.parse_assignment(start)?
            }
            _ => return Err(self.expected("statement")),
        };
        Ok(Some(stmt))
    }

    fn at_local_declaration(&self) -> bool {
        match self.current() {
            SvToken::Automatic
            | SvToken::Static
            | SvToken::Const
            | SvToken::Var
            | SvToken::Typedef
            | SvToken::Ref => true,
            kind if kind.is_direction() => true,
            _ => self.at_signal_declaration(),
        }
    }

    /// Parses a declaration inside a procedure or function and records the
    /// declared names as locals.
    fn parse_local_declaration(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        while matches!(
            self.current(),
            SvToken::Automatic | SvToken::Static | SvToken::Const | SvToken::Var | SvToken::Ref
        ) || self.current().is_direction()
        {
            self.advance();
        }
        if self.eat(SvToken::Typedef) {
            self.skip_to_semicolon();
            return Ok(Statement::Other(start.merge(self.prev_span())));
        }
        self.parse_data_type()?;
        loop {
            let (name, _) = self.expect_ident()?;
            self.locals.push(name);
            self.skip_unpacked_dims();
            if self.eat(SvToken::Equals) {
                self.parse_expr()?;
            }
            if !self.eat(SvToken::Comma) {
                break;
            }
        }
        self.expect(SvToken::Semicolon, "`;` after declaration")?;
        Ok(Statement::Other(start.merge(self.prev_span())))
    }

    /// Parses an assignment, an increment, or a task call.
    fn parse_assignment(&mut self, start: Span) -> Result<Statement, ParseError> {
        let lhs = self.parse_unary_expr()?;
        let op_span = self.current_span();
        let (op, compound) = match self.current() {
            SvToken::Equals => (AssignOp::Blocking, false),
            SvToken::LessEquals => (AssignOp::NonBlocking, false),
            kind if kind.is_assignment_op() => (AssignOp::Blocking, true),
            SvToken::PlusPlus | SvToken::MinusMinus => {
                self.advance();
                self.expect(SvToken::Semicolon, "`;` after increment")?;
                return Ok(Statement::Other(start.merge(self.prev_span())));
            }
            SvToken::Semicolon => {
                self.advance();
                return Ok(Statement::Other(start.merge(self.prev_span())));
            }
            _ => return Err(self.expected("`=`, `<=`, or `;`")),
        };
        self.advance();

        // Intra-assignment timing control.
        match self.current() {
            SvToken::Hash => self.skip_delay(),
            SvToken::At => {
                self.parse_sensitivity()?;
            }
            _ => {}
        }

        let rhs = self.parse_expr()?;
        self.expect(SvToken::Semicolon, "`;` after assignment")?;
        let mut targets = Vec::new();
        targets_of(&lhs, &mut targets);
        Ok(Statement::Assign(Assignment {
            targets,
            op,
            compound,
            rhs,
            enclosing: self.context,
            op_span,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_if(&mut self, qualifier: Option<Qualifier>, start: Span) -> Result<IfStmt, ParseError> {
        self.expect(SvToken::If, "`if`")?;
        self.expect(SvToken::LeftParen, "`(` after `if`")?;
        let cond = self.parse_expr()?;
        let cond_close = self.expect(SvToken::RightParen, "`)` to close the condition")?;
        let then_block = self.parse_branch(BlockParent::If)?;

        let mut else_kw = None;
        let mut else_branch = None;
        if self.at(SvToken::Else) {
            else_kw = Some(self.current_span());
            self.advance();
            let nested_start = self.current_span();
            let nested_qualifier = qualifier_of(self.current());
            let branch = if self.at(SvToken::If) {
                ElseBranch::If(Box::new(self.parse_if(None, nested_start)?))
            } else if nested_qualifier.is_some() && self.peek_kind(1) == SvToken::If {
                self.advance();
                ElseBranch::If(Box::new(self.parse_if(nested_qualifier, nested_start)?))
            } else {
                ElseBranch::Block(self.parse_branch(BlockParent::Else)?)
            };
            else_branch = Some(branch);
        }

        Ok(IfStmt {
            qualifier,
            cond,
            cond_close,
            then_block,
            else_kw,
            else_branch,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_case(
        &mut self,
        qualifier: Option<Qualifier>,
        start: Span,
    ) -> Result<CaseStmt, ParseError> {
        let keyword_span = self.current_span();
        let kind = match self.current() {
            SvToken::Casez => CaseKind::Casez,
            SvToken::Casex => CaseKind::Casex,
            _ => CaseKind::Case,
        };
        self.advance();
        self.expect(SvToken::LeftParen, "`(` after `case`")?;
        let subject = self.parse_expr()?;
        self.expect(SvToken::RightParen, "`)` to close the case expression")?;
        let inside = self.eat(SvToken::Inside);

        let mut items = Vec::new();
        let mut default = None;
        loop {
            let item_start = self.current_span();
            match self.current() {
                SvToken::Endcase => {
                    self.advance();
                    break;
                }
                SvToken::Eof | SvToken::Endmodule => return Err(self.expected("`endcase`")),
                SvToken::Default => {
                    self.advance();
                    self.eat(SvToken::Colon);
                    let body = self.parse_branch(BlockParent::CaseItem)?;
                    default.get_or_insert(items.len());
                    items.push(CaseItem {
                        labels: Vec::new(),
                        body,
                        is_default: true,
                        span: item_start.merge(self.prev_span()),
                    });
                }
                _ => {
                    let mut labels = Vec::new();
                    loop {
                        let label = if inside {
                            self.parse_value_range()?
                        } else {
                            self.parse_expr()?
                        };
                        labels.push(label);
                        if !self.eat(SvToken::Comma) {
                            break;
                        }
                    }
                    self.expect(SvToken::Colon, "`:` after case item")?;
                    let body = self.parse_branch(BlockParent::CaseItem)?;
                    items.push(CaseItem {
                        labels,
                        body,
                        is_default: false,
                        span: item_start.merge(self.prev_span()),
                    });
                }
            }
        }

        Ok(CaseStmt {
            qualifier,
            kind,
            inside,
            subject,
            items,
            default,
            keyword_span,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_loop(&mut self, start: Span) -> Result<LoopStmt, ParseError> {
        let kind = match self.current() {
            SvToken::For => LoopKind::For,
            SvToken::Foreach => LoopKind::Foreach,
            SvToken::While => LoopKind::While,
            SvToken::Repeat => LoopKind::Repeat,
            SvToken::Forever => LoopKind::Forever,
            _ => LoopKind::DoWhile,
        };
        self.advance();

        if kind == LoopKind::DoWhile {
            let body = self.parse_branch(BlockParent::Loop)?;
            self.expect(SvToken::While, "`while` after `do` body")?;
            if !self.at(SvToken::LeftParen) {
                return Err(self.expected("`(` after `while`"));
            }
            self.skip_group();
            self.expect(SvToken::Semicolon, "`;` after `do ... while`")?;
            return Ok(LoopStmt {
                kind,
                body,
                span: start.merge(self.prev_span()),
            });
        }

        if kind != LoopKind::Forever {
            if !self.at(SvToken::LeftParen) {
                return Err(self.expected("`(` after loop keyword"));
            }
            self.skip_group();
        }
        let body = self.parse_branch(BlockParent::Loop)?;
        Ok(LoopStmt {
            kind,
            body,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses `function ... endfunction`. The name is the last identifier
    /// before the argument list or the header's `;`.
    pub(crate) fn parse_function(&mut self) -> Result<Function, ParseError> {
        let start = self.expect(SvToken::Function, "`function`")?;
        let mut name = None;
        while !matches!(self.current(), SvToken::LeftParen | SvToken::Semicolon) {
            if self.at_eof() || self.at(SvToken::Endfunction) {
                return Err(self.expected("function name"));
            }
            if self.current().is_identifier() {
                name = Some((
                    self.interner.get_or_intern(self.current_text()),
                    self.current_span(),
                ));
            }
            if self.at(SvToken::LeftBracket) {
                self.skip_group();
            } else {
                self.advance();
            }
        }
        let Some((name, name_span)) = name else {
            return Err(self.expected("function name"));
        };
        if self.at(SvToken::LeftParen) {
            self.skip_group();
        }
        self.expect(SvToken::Semicolon, "`;` after function header")?;

        self.context = BlockParent::Function;
        self.locals.clear();
        let body_start = self.current_span();
        let mut statements = Vec::new();
        loop {
            match self.current() {
                SvToken::Endfunction => break,
                SvToken::Eof | SvToken::Endmodule => {
                    return Err(self.expected("`endfunction`"));
                }
                _ => statements.extend(self.parse_statement()?),
            }
        }
        let body_span = if statements.is_empty() {
            body_start
        } else {
            body_start.merge(self.prev_span())
        };
        self.advance();
        self.eat_end_label();
        self.locals.clear();

        Ok(Function {
            name,
            name_span,
            body: Block {
                parent: BlockParent::Function,
                delimited: false,
                label: None,
                statements,
                span: body_span,
            },
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses `assign [strength] [#delay] a = x, b = y;`.
    pub(crate) fn parse_continuous_assign(&mut self) -> Result<Vec<Assignment>, ParseError> {
        let start = self.expect(SvToken::Assign, "`assign`")?;
        if self.at(SvToken::LeftParen) {
            self.skip_group();
        }
        if self.at(SvToken::Hash) {
            self.skip_delay();
        }

        let mut assigns = Vec::new();
        loop {
            let item_start = if assigns.is_empty() {
                start
            } else {
                self.current_span()
            };
            let lhs = self.parse_unary_expr()?;
            let op_span = self.expect(SvToken::Equals, "`=` in continuous assignment")?;
            let rhs = self.parse_expr()?;
            let mut targets = Vec::new();
            targets_of(&lhs, &mut targets);
            assigns.push(Assignment {
                targets,
                op: AssignOp::Continuous,
                compound: false,
                rhs,
                enclosing: BlockParent::Module,
                op_span,
                span: item_start.merge(self.prev_span()),
            });
            if !self.eat(SvToken::Comma) {
                break;
            }
        }
        self.expect(SvToken::Semicolon, "`;` after continuous assignment")?;
        Ok(assigns)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::lex;
    use crate::parser::{parse, ParseOutput};
    use crate::tree::*;
    use svstyle_common::Interner;
    use svstyle_source::FileId;

    fn parse_str(source: &str) -> (ParseOutput, Interner) {
        let interner = Interner::new();
        let tokens = lex(source, FileId::from_raw(0)).unwrap();
        let out = parse(&tokens, source, &interner);
        (out, interner)
    }

    fn parse_body(body: &str) -> (ModuleTree, Interner) {
        let src = format!("module m;\n{body}\nendmodule\n");
        let (mut out, interner) = parse_str(&src);
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
        (out.modules.remove(0), interner)
    }

    fn target_names(a: &Assignment, i: &Interner) -> Vec<String> {
        a.targets.iter().map(|t| i.resolve(t.name).to_string()).collect()
    }

    #[test]
    fn always_ff_sensitivity_list() {
        let (m, i) = parse_body(
            "always_ff @(posedge clk_i or negedge rst_ni) begin\n  if (!rst_ni) q <= 1'b0;\n  else q <= d;\nend",
        );
        let p = &m.procedures[0];
        assert_eq!(p.kind, ProcKind::AlwaysFf);
        let sens = p.sensitivity.as_ref().unwrap();
        assert!(!sens.star);
        let events: Vec<_> = sens
            .events
            .iter()
            .map(|e| (e.edge, i.resolve(e.signal.unwrap()).to_string()))
            .collect();
        assert_eq!(
            events,
            vec![
                (Some(Edge::Posedge), "clk_i".to_string()),
                (Some(Edge::Negedge), "rst_ni".to_string()),
            ]
        );
        assert_eq!(sens.separators.len(), 1);
        assert_eq!(sens.separators[0].kind, SeparatorKind::Or);
        assert!(p.body.delimited);
        assert_eq!(p.body.parent, BlockParent::AlwaysFf);
        assert_eq!(p.body.statements.len(), 1);
    }

    #[test]
    fn sensitivity_separators() {
        let (m, _) = parse_body(
            "always @(posedge a, negedge b | c || d) x <= 1;\nalways @* y = z;\nalways @(*) w = v;",
        );
        let kinds: Vec<_> = m.procedures[0]
            .sensitivity
            .as_ref()
            .unwrap()
            .separators
            .iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            [SeparatorKind::Comma, SeparatorKind::Pipe, SeparatorKind::DoublePipe]
        );
        assert_eq!(m.procedures[0].sensitivity.as_ref().unwrap().events.len(), 4);
        assert!(m.procedures[1].sensitivity.as_ref().unwrap().star);
        assert!(m.procedures[2].sensitivity.as_ref().unwrap().star);
        assert!(!m.procedures[1].body.delimited);
    }

    #[test]
    fn always_ff_without_edge_is_kept() {
        let (out, _) = parse_str("module m;\nalways_ff @(a) q <= d;\nendmodule");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(
            out.errors[0].message,
            "always_ff sensitivity list has no clock edge"
        );
        assert_eq!(out.errors[0].line, 2);
        assert_eq!(out.modules[0].procedures.len(), 1);
    }

    #[test]
    fn malformed_always_is_dropped_and_module_kept() {
        let src = "module m;\nalways_comb begin\n  a = ;\nend\nalways_comb b = c;\nendmodule";
        let (out, _) = parse_str(src);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].line, 3);
        assert_eq!(out.modules.len(), 1);
        assert_eq!(out.modules[0].procedures.len(), 1);
    }

    #[test]
    fn assignment_kinds_and_targets() {
        let (m, i) = parse_body(
            "always_comb begin\n  a = b;\n  c[3:0] <= d;\n  {e, f[1]} = g;\n  h += 1;\n  k++;\n  do_task(a);\n  $display(\"x\");\nend",
        );
        let body = &m.procedures[0].body;
        let assigns: Vec<_> = body.statements.iter().flat_map(|s| s.assignments()).collect();
        assert_eq!(assigns.len(), 4);
        assert_eq!(assigns[0].op, AssignOp::Blocking);
        assert_eq!(assigns[1].op, AssignOp::NonBlocking);
        assert!(assigns[1].targets[0].selected);
        assert_eq!(target_names(assigns[2], &i), ["e", "f"]);
        assert!(!assigns[2].targets[0].selected);
        assert!(assigns[2].targets[1].selected);
        assert!(assigns[3].compound);
        assert!(assigns.iter().all(|a| a.enclosing == BlockParent::AlwaysComb));
        assert_eq!(body.statements.len(), 7);
    }

    #[test]
    fn if_else_if_chain() {
        let (m, _) = parse_body(
            "always_comb begin\n  if (a) x = 1;\n  else if (b) begin\n    x = 2;\n  end\n  else\n    x = 3;\nend",
        );
        let Statement::If(stmt) = &m.procedures[0].body.statements[0] else {
            panic!("expected if");
        };
        assert!(!stmt.then_block.delimited);
        assert_eq!(stmt.then_block.parent, BlockParent::If);
        assert!(stmt.else_kw.is_some());
        let Some(ElseBranch::If(nested)) = &stmt.else_branch else {
            panic!("expected else if");
        };
        assert!(nested.then_block.delimited);
        let Some(ElseBranch::Block(last)) = &nested.else_branch else {
            panic!("expected else");
        };
        assert_eq!(last.parent, BlockParent::Else);
        assert!(!last.delimited);
        assert_eq!(m.procedures[0].body.statements[0].assignments().len(), 3);
    }

    #[test]
    fn qualified_if_and_case() {
        let (m, _) = parse_body(
            "always_comb begin\n  unique if (a) x = 1;\n  else priority if (b) x = 2;\n  unique0 case (s) 1: x = 3; endcase\nend",
        );
        let stmts = &m.procedures[0].body.statements;
        let Statement::If(first) = &stmts[0] else {
            panic!("expected if");
        };
        assert_eq!(first.qualifier, Some(Qualifier::Unique));
        let Some(ElseBranch::If(nested)) = &first.else_branch else {
            panic!("expected else if");
        };
        assert_eq!(nested.qualifier, Some(Qualifier::Priority));
        let Statement::Case(case) = &stmts[1] else {
            panic!("expected case");
        };
        assert_eq!(case.qualifier, Some(Qualifier::Unique0));
    }

    #[test]
    fn case_items_and_default() {
        let (m, _) = parse_body(
            "always_comb begin\n  casez (sel)\n    2'b1?: y = a;\n    2'b01, 2'b00: begin y = b; end\n    default: ;\n  endcase\nend",
        );
        let Statement::Case(case) = &m.procedures[0].body.statements[0] else {
            panic!("expected case");
        };
        assert_eq!(case.kind, CaseKind::Casez);
        assert!(!case.inside);
        assert_eq!(case.items.len(), 3);
        assert_eq!(case.items[1].labels.len(), 2);
        assert!(case.items[1].body.delimited);
        assert_eq!(case.default, Some(2));
        assert!(case.items[2].is_default);
        assert!(case.items[2].body.statements.is_empty());
    }

    #[test]
    fn case_inside_with_ranges() {
        let (m, _) = parse_body(
            "always_comb\n  case (v) inside\n    [0:3]: y = 0;\n    4, 5: y = 1;\n    default y = 2;\n  endcase",
        );
        let Statement::Case(case) = &m.procedures[0].body.statements[0] else {
            panic!("expected case");
        };
        assert!(case.inside);
        assert!(matches!(case.items[0].labels[0], crate::expr::Expr::Opaque(_)));
        assert_eq!(case.default, Some(2));
    }

    #[test]
    fn loops_and_locals() {
        let (m, i) = parse_body(
            "always_comb begin\n  automatic int unsigned count = 0;\n  logic [3:0] tmp;\n  for (int j = 0; j < 4; j++) begin\n    count += v[j];\n  end\n  while (c) c = c - 1;\n  do c++; while (c < 4);\n  repeat (3) tmp = tmp + 1;\n  forever #1 tmp = 0;\nend",
        );
        let p = &m.procedures[0];
        let locals: Vec<_> = p.locals.iter().map(|l| i.resolve(*l)).collect();
        assert_eq!(locals, ["count", "tmp"]);
        let kinds: Vec<_> = p
            .body
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::Loop(l) => Some(l.kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            [
                LoopKind::For,
                LoopKind::While,
                LoopKind::DoWhile,
                LoopKind::Repeat,
                LoopKind::Forever
            ]
        );
        let Statement::Loop(for_loop) = &p.body.statements[2] else {
            panic!("expected loop");
        };
        assert_eq!(for_loop.body.parent, BlockParent::Loop);
        assert!(for_loop.body.delimited);
    }

    #[test]
    fn labels_delays_and_timing_controls() {
        let (m, i) = parse_body(
            "always begin : proc\n  #5 clk = ~clk;\n  @(posedge clk) q <= #1 d;\n  step: x = 1;\nend : proc",
        );
        let body = &m.procedures[0].body;
        assert_eq!(body.label, i.get("proc"));
        let assigns: Vec<_> = body.statements.iter().flat_map(|s| s.assignments()).collect();
        assert_eq!(assigns.len(), 3);
        assert_eq!(assigns[1].op, AssignOp::NonBlocking);
    }

    #[test]
    fn continuous_assignments() {
        let (m, i) = parse_body("assign a = b & c, d = ~e;\nassign #2 {f, g} = h;");
        assert_eq!(m.assigns.len(), 3);
        assert!(m.assigns.iter().all(|a| a.op == AssignOp::Continuous));
        assert!(m.assigns.iter().all(|a| a.enclosing == BlockParent::Module));
        assert_eq!(target_names(&m.assigns[1], &i), ["d"]);
        assert_eq!(target_names(&m.assigns[2], &i), ["f", "g"]);
    }

    #[test]
    fn functions() {
        let (m, i) = parse_body(
            "function automatic logic [3:0] incr(input logic [3:0] v);\n  logic [3:0] r;\n  r = v + 1;\n  return r;\nendfunction : incr\nfunction int legacy;\n  input a;\n  begin\n    legacy = a;\n  end\nendfunction",
        );
        assert_eq!(m.functions.len(), 2);
        let f = &m.functions[0];
        assert_eq!(i.resolve(f.name), "incr");
        assert_eq!(f.body.parent, BlockParent::Function);
        assert!(!f.body.delimited);
        assert_eq!(f.body.statements.len(), 3);
        let assign = f.body.statements[1].assignments()[0];
        assert_eq!(assign.enclosing, BlockParent::Function);
        let g = &m.functions[1];
        assert_eq!(i.resolve(g.name), "legacy");
        assert!(matches!(&g.body.statements[1], Statement::Block(b) if b.delimited));
    }

    #[test]
    fn null_branch_has_no_statements() {
        let (m, _) = parse_body("always_comb if (a) ; else b = 1;");
        let Statement::If(stmt) = &m.procedures[0].body.statements[0] else {
            panic!("expected if");
        };
        assert!(stmt.then_block.statements.is_empty());
    }

    #[test]
    fn nested_begin_is_bare_block() {
        let (m, _) = parse_body("always_comb begin\n  begin : inner\n    a = 1;\n  end\nend");
        let Statement::Block(inner) = &m.procedures[0].body.statements[0] else {
            panic!("expected block");
        };
        assert_eq!(inner.parent, BlockParent::Bare);
        assert!(inner.label.is_some());
    }

    #[test]
    fn unterminated_begin_reports_end() {
        let (out, _) = parse_str("module m;\nalways_comb begin\n  a = 1;\nendmodule");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].message, "expected `end`, found `endmodule`");
        assert_eq!(out.modules.len(), 1);
    }
}
