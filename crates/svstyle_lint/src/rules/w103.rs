//! W103: Dangling statement — a branch body on its own line without `begin`/`end`.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use svstyle_parser::{Block, ElseBranch};
use svstyle_source::Span;

use crate::helpers::for_each_if;
use crate::{LintContext, LintRule};

/// Detects `if`/`else` branches whose single statement sits on a later line.
///
/// A one-line statement may follow its condition (or `else`) on the same
/// line. Moved to the next line without `begin`/`end`, it reads as if later
/// statements at the same indentation belonged to the branch.
pub struct DanglingStatement;

impl LintRule for DanglingStatement {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 103)
    }

    fn name(&self) -> &str {
        "dangling-statement"
    }

    fn description(&self) -> &str {
        "branch statement on a separate line without begin/end"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for body in ctx.bodies() {
            for_each_if(body, &mut |stmt| {
                diags.extend(self.check_branch(ctx, &stmt.then_block, stmt.cond_close, "if"));
                if let (Some(ElseBranch::Block(block)), Some(else_kw)) =
                    (&stmt.else_branch, stmt.else_kw)
                {
                    diags.extend(self.check_branch(ctx, block, else_kw, "else"));
                }
            });
        }
        diags
    }
}

impl DanglingStatement {
    fn check_branch(
        &self,
        ctx: &LintContext<'_>,
        block: &Block,
        anchor: Span,
        keyword: &str,
    ) -> Option<Diagnostic> {
        if block.delimited {
            return None;
        }
        let [stmt] = block.statements.as_slice() else {
            return None;
        };
        let span = stmt.span();
        let line = ctx.start_line(span);
        if line != ctx.end_line(span) || line <= ctx.end_line(anchor) {
            return None;
        }
        Some(
            Diagnostic::warning(
                self.code(),
                format!("`{keyword}` branch statement is on its own line without begin/end"),
                span,
            )
            .with_label(Label::secondary(anchor, format!("`{keyword}` ends here")))
            .with_help("move the statement onto the same line or wrap it in begin/end"),
        )
    }
}
