//! C205: d/q naming — a `_q` register is driven from its `_d` signal.

use svstyle_common::Ident;
use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use svstyle_parser::{Expr, IfStmt, ProcKind, SignalClass, Statement};
use svstyle_source::Span;

use crate::helpers::{first_if, is_reset_name, negated_signal, whole_target};
use crate::{LintContext, LintRule};

/// Checks the `_d`/`_q` pairing of registers in `always_ff` blocks.
///
/// Every `x_q` written in an `always_ff` must be assigned from `x_d` in at
/// least one assignment outside the reset branch. Assigning `x_q` from a
/// `y_d` with a different base is reported as a mismatch.
///
/// A register that is assigned straight from a signal computed in an
/// `always_comb` forms a d/q pair even when its names say otherwise, so
/// `state <= next_state` and `cnt <= cnt_d` are reported with the names the
/// pair should carry. Ports are left to the naming-suffix rule. Each register
/// name is reported once.
pub struct DqNaming;

impl LintRule for DqNaming {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 205)
    }

    fn name(&self) -> &str {
        "dq-naming"
    }

    fn description(&self) -> &str {
        "`_q` register is not driven from its `_d` signal"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let comb = comb_writes(ctx);
        let mut registers: Vec<Register> = Vec::new();
        let mut pairs: Vec<Pair> = Vec::new();

        for proc in &ctx.module.procedures {
            if proc.kind != ProcKind::AlwaysFf {
                continue;
            }
            let reset = first_if(&proc.body)
                .filter(|stmt| tests_reset(ctx, stmt))
                .map(|stmt| stmt.then_block.span);

            proc.body.walk(&mut |stmt| {
                let Statement::Assign(assign) = stmt else {
                    return;
                };
                if reset.is_some_and(|r| r.contains(assign.span)) {
                    return;
                }
                for target in &assign.targets {
                    let name = ctx.name(target.name);
                    let Some(base) = name.strip_suffix("_q") else {
                        continue;
                    };
                    let index = match registers.iter().position(|r| r.name == target.name) {
                        Some(index) => index,
                        None => {
                            registers.push(Register {
                                name: target.name,
                                first: target.span,
                                driven: false,
                                mismatch: None,
                            });
                            registers.len() - 1
                        }
                    };
                    let reg = &mut registers[index];
                    let expected = format!("{base}_d");
                    let mut driven = false;
                    assign.rhs.for_each_name(&mut |n, _| driven |= ctx.name(n) == expected);
                    reg.driven |= driven;
                    if !driven && reg.mismatch.is_none() {
                        reg.mismatch = other_d_source(ctx, &assign.rhs);
                    }
                }

                let Some(reg) = whole_target(assign) else {
                    return;
                };
                let Some(source) = plain_name(&assign.rhs) else {
                    return;
                };
                let Some(&(_, comb_span)) = comb.iter().find(|(n, _)| *n == source) else {
                    return;
                };
                if ctx.name(reg).ends_with("_q")
                    || is_port(ctx, reg)
                    || pairs.iter().any(|p| p.reg == reg)
                {
                    return;
                }
                pairs.push(Pair {
                    reg,
                    span: assign.span,
                    source,
                    comb_span,
                });
            });
        }

        let mut diags: Vec<Diagnostic> = registers
            .iter()
            .filter(|r| !r.driven)
            .map(|reg| {
                let name = ctx.name(reg.name);
                let expected = format!("{}_d", name.trim_end_matches("_q"));
                match reg.mismatch {
                    Some((source, span)) => Diagnostic::warning(
                        self.code(),
                        format!(
                            "register `{name}` is assigned from `{}`; expected `{expected}`",
                            ctx.name(source)
                        ),
                        span,
                    )
                    .with_label(Label::secondary(reg.first, "register written here")),
                    None => Diagnostic::warning(
                        self.code(),
                        format!("register `{name}` is not driven by `{expected}`"),
                        reg.first,
                    ),
                }
            })
            .collect();

        diags.extend(pairs.iter().map(|pair| {
            let reg = ctx.name(pair.reg);
            let source = ctx.name(pair.source);
            let base = source.strip_suffix("_d").unwrap_or(reg);
            Diagnostic::warning(
                self.code(),
                format!(
                    "register `{reg}` and its next-state signal `{source}` should be named `{base}_q` and `{base}_d`"
                ),
                pair.span,
            )
            .with_label(Label::secondary(pair.comb_span, "next-state signal written in always_comb"))
        }));

        diags
    }
}

struct Register {
    name: Ident,
    first: Span,
    driven: bool,
    mismatch: Option<(Ident, Span)>,
}

/// A register assigned straight from a combinationally computed signal.
struct Pair {
    reg: Ident,
    span: Span,
    source: Ident,
    comb_span: Span,
}

/// Signals written in any `always_comb`, with their first write. Variables
/// declared inside the procedure are left out.
fn comb_writes(ctx: &LintContext<'_>) -> Vec<(Ident, Span)> {
    let mut out: Vec<(Ident, Span)> = Vec::new();
    for proc in &ctx.module.procedures {
        if proc.kind != ProcKind::AlwaysComb {
            continue;
        }
        proc.body.walk(&mut |stmt| {
            let Statement::Assign(assign) = stmt else {
                return;
            };
            for target in &assign.targets {
                if !proc.locals.contains(&target.name) && !out.iter().any(|(n, _)| *n == target.name) {
                    out.push((target.name, target.span));
                }
            }
        });
    }
    out
}

fn is_port(ctx: &LintContext<'_>, name: Ident) -> bool {
    ctx.module
        .lookup(name)
        .is_some_and(|decl| matches!(decl.class, SignalClass::Port(_)))
}

fn tests_reset(ctx: &LintContext<'_>, stmt: &IfStmt) -> bool {
    if negated_signal(&stmt.cond).is_some() {
        return true;
    }
    let mut found = false;
    stmt.cond
        .for_each_name(&mut |n, _| found |= is_reset_name(ctx.name(n)));
    found
}

/// A right-hand side that is a bare signal name.
fn plain_name(rhs: &Expr) -> Option<Ident> {
    match rhs.strip_parens() {
        Expr::Name {
            name,
            selects,
            qualified: false,
            ..
        } if selects.is_empty() => Some(*name),
        _ => None,
    }
}

/// A right-hand side that is a plain `_d` signal.
fn other_d_source(ctx: &LintContext<'_>, rhs: &Expr) -> Option<(Ident, Span)> {
    match rhs.strip_parens() {
        Expr::Name { name, span, .. } if ctx.name(*name).ends_with("_d") => Some((*name, *span)),
        _ => None,
    }
}
