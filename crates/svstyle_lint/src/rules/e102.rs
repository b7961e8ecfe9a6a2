//! E102: Assignment kind — blocking vs nonblocking discipline per procedure.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity, SuggestedFix};
use svstyle_parser::{AssignOp, BlockParent, Statement};

use crate::{LintContext, LintRule};

/// Detects assignments of the wrong kind for their procedure.
///
/// `always_comb` and `always_latch` use blocking `=`; `always_ff` uses
/// nonblocking `<=`. Compound operators such as `+=` are blocking. Each
/// offending assignment is reported at its operator.
pub struct AssignmentKind;

impl LintRule for AssignmentKind {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 102)
    }

    fn name(&self) -> &str {
        "assignment-kind"
    }

    fn description(&self) -> &str {
        "blocking assignment in always_ff or nonblocking assignment in combinational logic"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for proc in &ctx.module.procedures {
            proc.body.walk(&mut |stmt| {
                let Statement::Assign(assign) = stmt else {
                    return;
                };
                let (message, replacement) = match (assign.enclosing, assign.op) {
                    (BlockParent::AlwaysFf, AssignOp::Blocking) => {
                        ("blocking assignment in always_ff", "<=")
                    }
                    (BlockParent::AlwaysComb | BlockParent::AlwaysLatch, AssignOp::NonBlocking) => {
                        ("nonblocking assignment in combinational logic", "=")
                    }
                    _ => return,
                };
                let mut diag = Diagnostic::error(self.code(), message, assign.op_span)
                    .with_label(Label::primary(
                        assign.op_span,
                        format!("in {}", assign.enclosing.describe()),
                    ));
                if !assign.compound {
                    diag = diag.with_fix(SuggestedFix::replace(
                        format!("use `{replacement}`"),
                        assign.op_span,
                        replacement,
                    ));
                }
                diags.push(diag);
            });
        }
        diags
    }
}
