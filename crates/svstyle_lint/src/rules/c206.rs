//! C206: Line length — lines inside a module stay within the configured limit.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};
use svstyle_source::Span;

use crate::{LintContext, LintRule};

/// Detects lines longer than `style.max_line_length` characters.
///
/// Every line from `module` through `endmodule` is measured in characters.
/// The diagnostic points at the first character past the limit.
pub struct LineLength;

impl LintRule for LineLength {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 206)
    }

    fn name(&self) -> &str {
        "line-length"
    }

    fn description(&self) -> &str {
        "line exceeds the maximum line length"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let max = ctx.options.max_line_length;
        let span = ctx.module.span;
        let mut diags = Vec::new();

        for line in ctx.start_line(span)..=ctx.end_line(span) {
            let text = ctx.file.line_text(line);
            let length = text.chars().count();
            if length <= max {
                continue;
            }
            let (Some(start), Some((overflow, _))) =
                (ctx.file.line_start(line), text.char_indices().nth(max))
            else {
                continue;
            };
            let from = start + overflow as u32;
            let to = start + text.len() as u32;
            diags.push(Diagnostic::warning(
                self.code(),
                format!("line is {length} characters long; the limit is {max}"),
                Span::new(span.file, from, to),
            ));
        }
        diags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{run_rule, run_rule_with};
    use svstyle_config::StyleOptions;
    use svstyle_diagnostics::Location;

    #[test]
    fn rule_metadata() {
        assert_eq!(LineLength.code().to_string(), "C206");
        assert_eq!(LineLength.name(), "line-length");
    }

    #[test]
    fn long_line_points_past_the_limit() {
        let options = StyleOptions {
            max_line_length: 20,
            ..StyleOptions::default()
        };
        let diags = run_rule_with(
            &LineLength,
            "module m;\n  logic a_very_long_signal_name;\nendmodule\n",
            &options,
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].location, Location::new(2, 21));
        assert_eq!(diags[0].message, "line is 32 characters long; the limit is 20");
    }

    #[test]
    fn default_limit_is_one_hundred() {
        let ok = format!("module m;\n  // {}\nendmodule\n", "x".repeat(95));
        assert!(run_rule(&LineLength, &ok).is_empty());
        let long = format!("module m;\n  // {}\nendmodule\n", "x".repeat(96));
        assert_eq!(run_rule(&LineLength, &long).len(), 1);
    }

    #[test]
    fn characters_not_bytes_are_counted() {
        let options = StyleOptions {
            max_line_length: 12,
            ..StyleOptions::default()
        };
        let diags = run_rule_with(
            &LineLength,
            "module m;\n// ééééééééé\nendmodule\n",
            &options,
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn lines_outside_modules_are_ignored() {
        let options = StyleOptions {
            max_line_length: 10,
            ..StyleOptions::default()
        };
        let diags = run_rule_with(
            &LineLength,
            "// a long header comment line\nmodule m;\nendmodule\n",
            &options,
        );
        assert!(diags.is_empty());
    }
}
