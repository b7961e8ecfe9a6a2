//! C202: Active-low suffix — active-low signals must carry an `_n` tag.

use std::collections::HashSet;

use svstyle_common::Ident;
use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};
use svstyle_parser::{Edge, ProcKind};
use svstyle_source::Span;

use crate::helpers::{clock_event, first_if, has_n_tag, negated_signal, with_n_tag};
use crate::{LintContext, LintRule};

/// Detects active-low signals whose names do not say so.
///
/// In an `always_ff` or edge-triggered `always`, a signal is taken to be
/// active-low when it is a `negedge` event other than the clock, or when the
/// first `if` of the body tests it for zero (`!x`, `~x`, `x == 0`). Each such
/// name is reported once, at its first occurrence.
pub struct ActiveLowSuffix;

impl LintRule for ActiveLowSuffix {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 202)
    }

    fn name(&self) -> &str {
        "active-low-suffix"
    }

    fn description(&self) -> &str {
        "active-low signal lacks an `_n` suffix"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        let mut reported: HashSet<Ident> = HashSet::new();

        for proc in &ctx.module.procedures {
            if !matches!(proc.kind, ProcKind::AlwaysFf | ProcKind::Always) {
                continue;
            }
            let Some(sens) = proc.sensitivity.as_ref().filter(|s| s.has_edge()) else {
                continue;
            };
            let clock = clock_event(sens).map(|e| e.span);

            let mut candidates: Vec<(Ident, Span)> = sens
                .events
                .iter()
                .filter(|e| e.edge == Some(Edge::Negedge) && Some(e.span) != clock)
                .filter_map(|e| Some((e.signal?, e.expr.span())))
                .collect();
            if let Some(stmt) = first_if(&proc.body) {
                if let Some(name) = negated_signal(&stmt.cond) {
                    candidates.push((name, stmt.cond.span()));
                }
            }

            for (name, span) in candidates {
                let text = ctx.name(name);
                if has_n_tag(text) || text.starts_with('\\') || !reported.insert(name) {
                    continue;
                }
                diags.push(
                    Diagnostic::warning(
                        self.code(),
                        format!("active-low signal `{text}` lacks an `_n` suffix"),
                        span,
                    )
                    .with_help(format!("rename to `{}`", with_n_tag(text))),
                );
            }
        }

        diags
    }
}
