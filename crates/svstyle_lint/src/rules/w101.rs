//! W101: Logical operator — use `&&`/`||` between truth values.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity, SuggestedFix};
use svstyle_parser::{BinaryOp, Expr};

use crate::helpers::{all_assignments, for_each_if, is_boolean, is_one_bit, whole_target};
use crate::{LintContext, LintRule};

/// Detects bitwise `&` and `|` used where a logical operator is meant.
///
/// In a 1-bit context (an `if` condition, or the right-hand side of an
/// assignment to a declared 1-bit signal) a bitwise `&` or `|` whose operands
/// are both truth values is reported once per operator.
pub struct LogicalOperator;

impl LintRule for LogicalOperator {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 101)
    }

    fn name(&self) -> &str {
        "logical-operator"
    }

    fn description(&self) -> &str {
        "bitwise operator used between boolean operands"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut contexts: Vec<&Expr> = Vec::new();
        for body in ctx.bodies() {
            for_each_if(body, &mut |stmt| contexts.push(&stmt.cond));
        }
        for assign in all_assignments(ctx) {
            if whole_target(assign).is_some_and(|name| is_one_bit(ctx, name)) {
                contexts.push(&assign.rhs);
            }
        }

        let mut diags = Vec::new();
        for expr in contexts {
            self.visit(ctx, expr, &mut diags);
        }
        diags
    }
}

impl LogicalOperator {
    fn visit(&self, ctx: &LintContext<'_>, expr: &Expr, diags: &mut Vec<Diagnostic>) {
        match expr {
            Expr::Binary {
                op,
                lhs,
                rhs,
                op_span,
                ..
            } => {
                let logical = match op {
                    BinaryOp::BitAnd => Some("&&"),
                    BinaryOp::BitOr => Some("||"),
                    _ => None,
                };
                if let Some(logical) = logical {
                    if is_boolean(ctx, lhs) && is_boolean(ctx, rhs) {
                        diags.push(
                            Diagnostic::warning(
                                self.code(),
                                format!(
                                    "bitwise `{}` between boolean operands; use `{logical}`",
                                    op.symbol()
                                ),
                                *op_span,
                            )
                            .with_label(Label::primary(*op_span, "bitwise operator"))
                            .with_fix(SuggestedFix::replace(
                                format!("use `{logical}`"),
                                *op_span,
                                logical,
                            )),
                        );
                    }
                }
                self.visit(ctx, lhs, diags);
                self.visit(ctx, rhs, diags);
            }
            Expr::Paren { inner, .. } => self.visit(ctx, inner, diags),
            Expr::Unary { operand, .. } => self.visit(ctx, operand, diags),
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                self.visit(ctx, cond, diags);
                self.visit(ctx, then_expr, diags);
                self.visit(ctx, else_expr, diags);
            }
            _ => {}
        }
    }
}
