//! C207: Tab character — indentation and alignment use spaces.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};
use svstyle_parser::SvToken;
use svstyle_source::Span;

use crate::{LintContext, LintRule};

/// Detects tab characters in whitespace inside a module, once per line.
pub struct TabCharacter;

impl LintRule for TabCharacter {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 207)
    }

    fn name(&self) -> &str {
        "tab-character"
    }

    fn description(&self) -> &str {
        "tab character used for whitespace"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let source = ctx.file.content.as_str();
        let mut diags = Vec::new();
        let mut last_line = 0;

        for token in ctx.module_tokens() {
            if token.kind != SvToken::Whitespace || token.line == last_line {
                continue;
            }
            let Some(offset) = token.text(source).find('\t') else {
                continue;
            };
            last_line = token.line;
            let start = token.span.start + offset as u32;
            diags.push(
                Diagnostic::warning(
                    self.code(),
                    "tab character in whitespace",
                    Span::new(token.span.file, start, start + 1),
                )
                .with_help("use spaces for indentation and alignment"),
            );
        }
        diags
    }
}
