//! W105: Sensitivity list — `always_ff` event lists match the reset structure.

use svstyle_common::Ident;
use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity, SuggestedFix};
use svstyle_parser::{Procedure, ProcKind, SeparatorKind};

use crate::helpers::{chain_conditions, clock_event, first_if, is_reset_name};
use crate::{LintContext, LintRule};

/// Checks the event list of every `always_ff`.
///
/// Events are joined with `or` or `,`. Every edge signal other than the clock
/// is an asynchronous control and must be tested in the `if` chain that opens
/// the body. A reset-named signal tested by that first `if` but missing from
/// the list is a synchronous reset; it is reported only when
/// `style.require_async_reset` is set.
pub struct SensitivityList;

impl LintRule for SensitivityList {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 105)
    }

    fn name(&self) -> &str {
        "sensitivity-list"
    }

    fn description(&self) -> &str {
        "always_ff event list does not match the reset structure of its body"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        ctx.module
            .procedures
            .iter()
            .filter(|p| p.kind == ProcKind::AlwaysFf)
            .flat_map(|p| self.check_procedure(ctx, p))
            .collect()
    }
}

impl SensitivityList {
    fn check_procedure(&self, ctx: &LintContext<'_>, proc: &Procedure) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        let Some(sens) = &proc.sensitivity else {
            return diags;
        };

        for sep in &sens.separators {
            let symbol = match sep.kind {
                SeparatorKind::Pipe => "|",
                SeparatorKind::DoublePipe => "||",
                SeparatorKind::Or | SeparatorKind::Comma => continue,
            };
            diags.push(
                Diagnostic::warning(
                    self.code(),
                    format!("`{symbol}` joins sensitivity events; use `or`"),
                    sep.span,
                )
                .with_fix(SuggestedFix::replace("replace with `or`", sep.span, "or")),
            );
        }

        let head = first_if(&proc.body);
        let mut tested: Vec<Ident> = Vec::new();
        if let Some(stmt) = head {
            for cond in chain_conditions(stmt) {
                cond.for_each_name(&mut |n, _| tested.push(n));
            }
        }

        let clock = clock_event(sens).map(|e| e.span);
        let mut listed: Vec<Ident> = Vec::new();
        for event in &sens.events {
            let Some(signal) = event.signal else {
                continue;
            };
            listed.push(signal);
            if event.edge.is_none() || Some(event.span) == clock || tested.contains(&signal) {
                continue;
            }
            diags.push(
                Diagnostic::warning(
                    self.code(),
                    format!(
                        "edge signal `{}` is not tested at the top of the block",
                        ctx.name(signal)
                    ),
                    event.span,
                )
                .with_help("test the signal in the first `if`, or drop it from the event list"),
            );
        }

        if let Some(stmt) = head.filter(|_| ctx.options.require_async_reset) {
            let mut resets: Vec<(Ident, _)> = Vec::new();
            stmt.cond.for_each_name(&mut |n, span| {
                if is_reset_name(ctx.name(n))
                    && !listed.contains(&n)
                    && !resets.iter().any(|(r, _)| *r == n)
                {
                    resets.push((n, span));
                }
            });
            for (name, span) in resets {
                diags.push(
                    Diagnostic::warning(
                        self.code(),
                        format!(
                            "reset `{}` is not in the sensitivity list; this is a synchronous reset",
                            ctx.name(name)
                        ),
                        span,
                    )
                    .with_label(Label::secondary(sens.span, "event list")),
                );
            }
        }

        diags
    }
}
