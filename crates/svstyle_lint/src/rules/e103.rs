//! E103: Combinational default — every signal of an `always_comb` gets an
//! unconditional default before any conditional write.

use std::collections::HashSet;

use svstyle_common::Ident;
use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use svstyle_parser::{ProcKind, Statement};

use crate::helpers::flatten;
use crate::{LintContext, LintRule};

/// Detects `always_comb` signals that may infer a latch.
///
/// Walking the top-level statements in order (looking through `begin`/`end`),
/// an unconditional assignment gives its targets a default. An `if`, `case`,
/// or loop that writes signals without a default is reported once, naming
/// every such signal. Variables declared inside the block are exempt.
pub struct CombDefault;

impl LintRule for CombDefault {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 103)
    }

    fn name(&self) -> &str {
        "comb-default"
    }

    fn description(&self) -> &str {
        "signal in always_comb is written conditionally without a default"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diags = Vec::new();

        for proc in &ctx.module.procedures {
            if proc.kind != ProcKind::AlwaysComb {
                continue;
            }
            let mut defaulted: HashSet<Ident> = proc.locals.iter().copied().collect();

            for stmt in flatten(&proc.body) {
                match stmt {
                    Statement::Assign(assign) => {
                        defaulted.extend(assign.targets.iter().map(|t| t.name));
                    }
                    Statement::If(_) | Statement::Case(_) | Statement::Loop(_) => {
                        let mut missing: Vec<Ident> = Vec::new();
                        for assign in stmt.assignments() {
                            for target in &assign.targets {
                                if !defaulted.contains(&target.name) && !missing.contains(&target.name) {
                                    missing.push(target.name);
                                }
                            }
                        }
                        if missing.is_empty() {
                            continue;
                        }
                        let names: Vec<String> =
                            missing.iter().map(|&n| format!("`{}`", ctx.name(n))).collect();
                        let message = match names.as_slice() {
                            [one] => format!("{one} has no default assignment before this statement"),
                            _ => format!(
                                "{} have no default assignment before this statement",
                                names.join(", ")
                            ),
                        };
                        let span = stmt.span();
                        diags.push(
                            Diagnostic::error(self.code(), message, span)
                                .with_label(Label::primary(span, "conditionally assigned here"))
                                .with_help("assign a default at the top of the always_comb block"),
                        );
                        // Reported signals are not reported again by later statements.
                        defaulted.extend(missing);
                    }
                    Statement::Block(_) | Statement::Other(_) => {}
                }
            }
        }

        diags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{lines, run_rule};

    #[test]
    fn rule_metadata() {
        assert_eq!(CombDefault.code().to_string(), "E103");
        assert_eq!(CombDefault.name(), "comb-default");
        assert_eq!(CombDefault.default_severity(), Severity::Error);
    }

    #[test]
    fn conditional_write_without_default() {
        let diags = run_rule(
            &CombDefault,
            "module m;
               always_comb begin
                 if (en) value = 3'd5;
               end
             endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(lines(&diags), [3]);
        assert_eq!(diags[0].message, "`value` has no default assignment before this statement");
    }

    #[test]
    fn default_first_passes() {
        let diags = run_rule(
            &CombDefault,
            "module m;
               always_comb begin
                 value = '0;
                 if (en) value = 3'd5;
               end
             endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn default_after_conditional_is_too_late() {
        let diags = run_rule(
            &CombDefault,
            "module m;
               always_comb begin
                 if (en) value = 3'd5;
                 value = '0;
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [3]);
    }

    #[test]
    fn one_diagnostic_lists_every_signal() {
        let diags = run_rule(
            &CombDefault,
            "module m;
               always_comb begin
                 a = 1'b0;
                 case (sel)
                   2'd0: begin b = 1'b1; c = 1'b0; end
                   default: begin a = 1'b1; b = 1'b0; end
                 endcase
                 if (x) b = 1'b1;
               end
             endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(lines(&diags), [4]);
        assert_eq!(
            diags[0].message,
            "`b`, `c` have no default assignment before this statement"
        );
    }

    #[test]
    fn nested_begin_end_is_flattened() {
        let diags = run_rule(
            &CombDefault,
            "module m;
               always_comb begin
                 begin
                   y = 1'b0;
                 end
                 if (a) y = 1'b1;
               end
             endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn locals_are_exempt() {
        let diags = run_rule(
            &CombDefault,
            "module m;
               always_comb begin
                 logic tmp;
                 y = 1'b0;
                 for (int i = 0; i < 4; i++) tmp = a[i];
                 if (tmp) y = 1'b1;
               end
             endmodule",
        );
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn always_ff_is_ignored() {
        let diags = run_rule(
            &CombDefault,
            "module m;\n  always_ff @(posedge clk) if (en) q <= d;\nendmodule",
        );
        assert!(diags.is_empty());
    }
}
