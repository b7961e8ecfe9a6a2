//! C208: Trailing whitespace at the end of a line.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity, SuggestedFix};
use svstyle_parser::SvToken;

use crate::{LintContext, LintRule};

/// Detects whitespace immediately before a line break inside a module.
pub struct TrailingWhitespace;

impl LintRule for TrailingWhitespace {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 208)
    }

    fn name(&self) -> &str {
        "trailing-whitespace"
    }

    fn description(&self) -> &str {
        "whitespace at the end of a line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let source = ctx.file.content.as_str();
        ctx.module_tokens()
            .windows(2)
            .filter(|pair| {
                pair[0].kind == SvToken::Whitespace
                    && pair[1].kind == SvToken::Newline
                    && !pair[0].text(source).trim_matches('\r').is_empty()
            })
            .map(|pair| {
                Diagnostic::warning(self.code(), "trailing whitespace", pair[0].span)
                    .with_fix(SuggestedFix::replace("remove it", pair[0].span, ""))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{lines, run_rule};

    #[test]
    fn rule_metadata() {
        assert_eq!(TrailingWhitespace.code().to_string(), "C208");
        assert_eq!(TrailingWhitespace.name(), "trailing-whitespace");
    }

    #[test]
    fn trailing_spaces_and_tabs() {
        let diags = run_rule(
            &TrailingWhitespace,
            "module m;  \n  logic a;\n  logic b;\t\n\nendmodule\n",
        );
        assert_eq!(lines(&diags), [1, 3]);
    }

    #[test]
    fn crlf_line_endings_are_not_trailing_whitespace() {
        let diags = run_rule(&TrailingWhitespace, "module m;\r\n  logic a;\r\nendmodule\r\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn whitespace_outside_module_is_ignored() {
        let diags = run_rule(&TrailingWhitespace, "// header   \nmodule m;\nendmodule   \n");
        assert!(diags.is_empty());
    }
}
