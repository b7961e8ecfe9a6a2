//! W104: Case completeness — a `case` covers every value or has a `default`.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use svstyle_parser::{CaseStmt, Qualifier, Statement};

use crate::{LintContext, LintRule};

/// Detects `case` statements that may leave values unhandled.
///
/// Without a `default`, a case is accepted only when its subject is a signal
/// of an enum type declared in the module and the labels name every member.
/// Anything else is reported, with a separate message for `unique`/`priority`
/// cases, whose simulation semantics turn a miss into a runtime violation.
/// A `default` item with an empty body is always reported.
pub struct CaseCompleteness;

impl LintRule for CaseCompleteness {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 104)
    }

    fn name(&self) -> &str {
        "case-completeness"
    }

    fn description(&self) -> &str {
        "case statement without default that does not cover every enum member"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for body in ctx.bodies() {
            body.walk(&mut |stmt| {
                if let Statement::Case(case) = stmt {
                    diags.extend(self.check_case(ctx, case));
                }
            });
        }
        diags
    }
}

impl CaseCompleteness {
    fn check_case(&self, ctx: &LintContext<'_>, case: &CaseStmt) -> Option<Diagnostic> {
        if let Some(index) = case.default {
            let item = case.items.get(index)?;
            if !item.body.statements.is_empty() {
                return None;
            }
            return Some(
                Diagnostic::warning(self.code(), "empty `default` item", item.span)
                    .with_help("assign safe values in the default branch"),
            );
        }

        let missing = match self.missing_members(ctx, case) {
            Some(missing) if missing.is_empty() => return None,
            Some(missing) => Some(missing),
            None => None,
        };

        let message = match case.qualifier {
            Some(q) => format!(
                "`{}` case has no `default` item and is not provably exhaustive",
                qualifier_keyword(q)
            ),
            None => "case has no `default` item and does not cover every value".to_string(),
        };
        let mut diag = Diagnostic::warning(self.code(), message, case.keyword_span)
            .with_label(Label::secondary(case.subject.span(), "case subject"));
        if let Some(missing) = missing {
            diag = diag.with_note(format!("unhandled enum members: {}", missing.join(", ")));
        }
        Some(diag.with_help("add a `default` item"))
    }

    /// The enum members the labels leave out, when the subject is a signal of
    /// a module-local enum type.
    fn missing_members<'a>(&self, ctx: &LintContext<'a>, case: &CaseStmt) -> Option<Vec<&'a str>> {
        let subject = case.subject.as_plain_name()?;
        let decl = ctx.module.lookup(subject)?;
        let enum_type = ctx.module.enum_of(decl)?;
        let named: Vec<_> = case
            .items
            .iter()
            .flat_map(|item| &item.labels)
            .filter_map(|label| label.as_plain_name())
            .collect();
        Some(
            enum_type
                .members
                .iter()
                .filter(|(member, _)| !named.contains(member))
                .map(|(member, _)| ctx.name(*member))
                .collect(),
        )
    }
}

fn qualifier_keyword(qualifier: Qualifier) -> &'static str {
    match qualifier {
        Qualifier::Unique => "unique",
        Qualifier::Unique0 => "unique0",
        Qualifier::Priority => "priority",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{lines, run_rule};

    const STATE_ENUM: &str = "typedef enum logic [1:0] {Idle, Receive, Done} state_e;
               state_e state;";

    #[test]
    fn rule_metadata() {
        assert_eq!(CaseCompleteness.code().to_string(), "W104");
        assert_eq!(CaseCompleteness.name(), "case-completeness");
    }

    #[test]
    fn partial_enum_coverage_warns() {
        let src = format!(
            "module m;
               {STATE_ENUM}
               logic [1:0] x;
               always_comb begin
                 x = '0;
                 unique case (state)
                   Idle:    x = 1;
                   Receive: x = 2;
                 endcase
               end
             endmodule"
        );
        let diags = run_rule(&CaseCompleteness, &src);
        assert_eq!(lines(&diags), [7]);
        assert_eq!(
            diags[0].message,
            "`unique` case has no `default` item and is not provably exhaustive"
        );
        assert_eq!(diags[0].notes, ["unhandled enum members: Done"]);
    }

    #[test]
    fn full_enum_coverage_passes() {
        let src = format!(
            "module m;
               {STATE_ENUM}
               logic [1:0] x;
               always_comb begin
                 unique case (state)
                   Idle:    x = 1;
                   Receive: x = 2;
                   Done:    x = 3;
                 endcase
               end
             endmodule"
        );
        assert!(run_rule(&CaseCompleteness, &src).is_empty());
    }

    #[test]
    fn non_enum_subject_without_default() {
        let diags = run_rule(
            &CaseCompleteness,
            "module m;
               logic [1:0] sel;
               logic x;
               always_comb begin
                 case (sel)
                   2'd0: x = 1'b0;
                   2'd1: x = 1'b1;
                 endcase
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [5]);
        assert_eq!(
            diags[0].message,
            "case has no `default` item and does not cover every value"
        );
        assert!(diags[0].notes.is_empty());
    }

    #[test]
    fn default_item_passes() {
        let diags = run_rule(
            &CaseCompleteness,
            "module m;
               logic [1:0] sel;
               logic x;
               always_comb begin
                 case (sel)
                   2'd0:    x = 1'b0;
                   default: x = 1'b1;
                 endcase
               end
             endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn empty_default_is_reported() {
        let diags = run_rule(
            &CaseCompleteness,
            "module m;
               logic [1:0] sel;
               logic x;
               always_comb begin
                 x = 1'b0;
                 case (sel)
                   2'd0:    x = 1'b1;
                   default: ;
                 endcase
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [8]);
        assert_eq!(diags[0].message, "empty `default` item");
    }

    #[test]
    fn nested_cases_are_checked() {
        let diags = run_rule(
            &CaseCompleteness,
            "module m;
               logic a, b, x;
               always_comb begin
                 x = 1'b0;
                 if (a) begin
                   case (b)
                     1'b0: x = 1'b1;
                   endcase
                 end
               end
             endmodule",
        );
        assert_eq!(lines(&diags), [6]);
    }
}
