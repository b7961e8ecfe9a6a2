//! C204: Block delimiter — multi-line bodies use `begin`/`end`.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};
use svstyle_parser::{Block, ElseBranch, Statement};

use crate::{LintContext, LintRule};

/// Detects bodies whose `begin`/`end` usage does not follow the guide.
///
/// A procedure, case item, or loop whose undelimited body does not fit on the
/// line of its header (the procedure keyword, the item labels, the loop
/// keyword) must wrap the body in `begin`/`end`. An `if`/`else` branch placed
/// on the next line is the dangling-statement rule's concern; here a branch is
/// only reported when its single statement itself spans several lines. A
/// function body, which is already delimited by `endfunction`, must not be
/// wrapped.
pub struct BlockDelimiter;

impl LintRule for BlockDelimiter {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 204)
    }

    fn name(&self) -> &str {
        "block-delimiter"
    }

    fn description(&self) -> &str {
        "multi-line body without begin/end, or function body wrapped in begin/end"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for proc in &ctx.module.procedures {
            diags.extend(self.check_body(ctx, &proc.body, proc.keyword_span.start));
            self.check_nested(ctx, &proc.body, &mut diags);
        }
        for func in &ctx.module.functions {
            diags.extend(self.check_function(&func.body));
            self.check_nested(ctx, &func.body, &mut diags);
        }
        diags
    }
}

impl BlockDelimiter {
    /// Checks the bodies of every `if`, `case`, and loop inside `block`.
    fn check_nested(&self, ctx: &LintContext<'_>, block: &Block, diags: &mut Vec<Diagnostic>) {
        block.walk(&mut |stmt| match stmt {
            Statement::If(chain) => {
                let mut current = Some(chain);
                while let Some(stmt) = current {
                    let then = &stmt.then_block;
                    diags.extend(self.check_body(ctx, then, then.span.start));
                    current = match &stmt.else_branch {
                        Some(ElseBranch::Block(b)) => {
                            diags.extend(self.check_body(ctx, b, b.span.start));
                            None
                        }
                        Some(ElseBranch::If(nested)) => Some(nested.as_ref()),
                        None => None,
                    };
                }
            }
            Statement::Case(case) => {
                for item in &case.items {
                    diags.extend(self.check_body(ctx, &item.body, item.span.start));
                }
            }
            Statement::Loop(lp) => diags.extend(self.check_body(ctx, &lp.body, lp.span.start)),
            Statement::Assign(_) | Statement::Block(_) | Statement::Other(_) => {}
        });
    }

    /// Reports an undelimited single-statement body that runs past the line
    /// its header starts on.
    fn check_body(&self, ctx: &LintContext<'_>, block: &Block, header: u32) -> Option<Diagnostic> {
        if block.delimited {
            return None;
        }
        let [stmt] = block.statements.as_slice() else {
            return None;
        };
        let span = stmt.span();
        if ctx.line(header) == ctx.end_line(span) {
            return None;
        }
        Some(
            Diagnostic::warning(
                self.code(),
                format!(
                    "multi-line {} body must be wrapped in begin/end",
                    block.parent.describe()
                ),
                span,
            )
            .with_help("add begin/end around the statement"),
        )
    }

    fn check_function(&self, body: &Block) -> Option<Diagnostic> {
        let inner = body.statements.iter().find_map(|s| match s {
            Statement::Block(b) => Some(b),
            _ => None,
        })?;
        Some(
            Diagnostic::warning(self.code(), "function body is wrapped in begin/end", inner.span)
                .with_help("remove the begin/end; endfunction already closes the body"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{lines, run_rule};

    #[test]
    fn rule_metadata() {
        assert_eq!(BlockDelimiter.code().to_string(), "C204");
        assert_eq!(BlockDelimiter.name(), "block-delimiter");
    }

    #[test]
    fn single_line_bodies_pass() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_comb if (a) x = 1; else x = 0;
               always_ff @(posedge clk) q <= d;
             endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn multi_line_if_branch() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_comb begin
                 if (a)
                   x = b ?
                       1 : 0;
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [4]);
        assert_eq!(diags[0].message, "multi-line if body must be wrapped in begin/end");
    }

    #[test]
    fn multi_line_procedure_body() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_ff @(posedge clk)
                 if (en) q <= d;
                 else    q <= q;
             endmodule",
        );
        assert_eq!(lines(&diags), [3]);
        assert_eq!(
            diags[0].message,
            "multi-line always_ff body must be wrapped in begin/end"
        );
    }

    #[test]
    fn multi_line_case_item() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_comb begin
                 case (s)
                   2'd0: if (a) x = 1;
                         else   x = 2;
                   default: x = 0;
                 endcase
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [4]);
        assert_eq!(diags[0].message, "multi-line case item body must be wrapped in begin/end");
    }

    #[test]
    fn procedure_body_on_the_next_line() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_comb
                 x = s[0];
             endmodule",
        );
        assert_eq!(lines(&diags), [3]);
        assert_eq!(
            diags[0].message,
            "multi-line always_comb body must be wrapped in begin/end"
        );
    }

    #[test]
    fn case_item_body_on_the_next_line() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_comb begin
                 case (s)
                   2'd0:
                     y = 1'b1;
                   default: y = 1'b0;
                 endcase
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [5]);
        assert_eq!(diags[0].message, "multi-line case item body must be wrapped in begin/end");
    }

    #[test]
    fn loop_body_on_the_next_line() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_comb begin
                 for (int i = 0; i < 4; i++)
                   y[i] = a[i];
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [4]);
        assert_eq!(diags[0].message, "multi-line loop body must be wrapped in begin/end");
    }

    #[test]
    fn if_branch_placement_is_left_to_dangling_statement() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_comb begin
                 if (a)
                   x = 1;
               end
             endmodule",
        );
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn multi_line_header_with_body_on_last_line() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_ff @(posedge clk_i or
                           negedge rst_ni) q <= d;
             endmodule",
        );
        assert_eq!(lines(&diags), [3]);
    }

    #[test]
    fn delimited_bodies_pass() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               always_ff @(posedge clk) begin
                 if (en) begin
                   q <= d;
                 end else begin
                   q <= q;
                 end
               end
             endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn function_wrapped_in_begin_end() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               function automatic logic f(input logic a);
                 begin
                   return a;
                 end
               endfunction
             endmodule",
        );
        assert_eq!(lines(&diags), [3]);
        assert_eq!(diags[0].message, "function body is wrapped in begin/end");
    }

    #[test]
    fn plain_function_passes() {
        let diags = run_rule(
            &BlockDelimiter,
            "module m;
               function automatic logic f(input logic a);
                 return a;
               endfunction
             endmodule",
        );
        assert!(diags.is_empty());
    }
}
