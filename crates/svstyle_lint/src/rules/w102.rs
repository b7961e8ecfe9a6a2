//! W102: Implicit truncation — a multi-bit value assigned to a 1-bit signal.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use svstyle_parser::{Expr, UnaryOp};

use crate::helpers::{all_assignments, is_multi_bit, is_one_bit, whole_target};
use crate::{LintContext, LintRule};

/// Detects multi-bit expressions silently narrowed to one bit.
///
/// Applies to assignments whose only target is a declared 1-bit signal
/// without a select. The right-hand side is reported when it is multi-bit
/// (a wide or parametric signal, a wide sized literal, a part select, a
/// multi-element concatenation, or arithmetic over such) and its top-level
/// operator does not already produce one bit. Mismatches between two
/// multi-bit widths are not checked.
pub struct ImplicitTruncation;

impl LintRule for ImplicitTruncation {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 102)
    }

    fn name(&self) -> &str {
        "implicit-truncation"
    }

    fn description(&self) -> &str {
        "multi-bit value implicitly truncated to one bit"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        all_assignments(ctx)
            .into_iter()
            .filter(|assign| !assign.compound)
            .filter_map(|assign| {
                let target = whole_target(assign).filter(|&name| is_one_bit(ctx, name))?;
                if yields_one_bit(&assign.rhs) || !is_multi_bit(ctx, &assign.rhs) {
                    return None;
                }
                let span = assign.rhs.span();
                Some(
                    Diagnostic::warning(
                        self.code(),
                        format!(
                            "multi-bit value assigned to 1-bit signal `{}`",
                            ctx.name(target)
                        ),
                        span,
                    )
                    .with_label(Label::primary(span, "only the least significant bit is kept"))
                    .with_help("select the intended bit or use a reduction or comparison"),
                )
            })
            .collect()
    }
}

/// Operators whose result is a single bit regardless of operand widths.
fn yields_one_bit(expr: &Expr) -> bool {
    match expr.strip_parens() {
        Expr::Binary { op, .. } => op.is_comparison() || op.is_logical(),
        Expr::Unary { op, .. } => *op == UnaryOp::LogNot || op.is_reduction(),
        Expr::Inside { .. } => true,
        _ => false,
    }
}
