//! W106: Legacy always — plain `always` instead of a typed procedure.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity, SuggestedFix};
use svstyle_parser::ProcKind;

use crate::{LintContext, LintRule};

/// Detects plain `always` procedures.
///
/// The fix offers `always_ff` for an edge-triggered list and `always_comb`
/// otherwise; the event list itself is left for the author to remove.
pub struct LegacyAlways;

impl LintRule for LegacyAlways {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 106)
    }

    fn name(&self) -> &str {
        "legacy-always"
    }

    fn description(&self) -> &str {
        "plain `always` instead of always_comb, always_ff, or always_latch"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        ctx.module
            .procedures
            .iter()
            .filter(|p| p.kind == ProcKind::Always)
            .map(|proc| {
                let edge = proc.sensitivity.as_ref().is_some_and(|s| s.has_edge());
                let replacement = if edge { "always_ff" } else { "always_comb" };
                Diagnostic::warning(
                    self.code(),
                    format!("plain `always`; use `{replacement}`"),
                    proc.keyword_span,
                )
                .with_fix(SuggestedFix::replace(
                    format!("replace with `{replacement}`"),
                    proc.keyword_span,
                    replacement,
                ))
            })
            .collect()
    }
}
