//! C209: Parameter case — constants are UpperCamelCase or ALL_CAPS.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};
use svstyle_parser::SignalClass;

use crate::helpers::{is_all_caps, is_upper_camel_case};
use crate::{LintContext, LintRule};

/// Checks the case of `parameter`, `localparam`, and enum member names.
pub struct ParameterCase;

impl LintRule for ParameterCase {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 209)
    }

    fn name(&self) -> &str {
        "parameter-case"
    }

    fn description(&self) -> &str {
        "parameter or enum member is neither UpperCamelCase nor ALL_CAPS"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let module = ctx.module;
        let params = module.params.iter().map(|p| {
            let kind = match p.class {
                SignalClass::Localparam => "localparam",
                _ => "parameter",
            };
            (kind, p.name, p.name_span)
        });
        let members = module
            .enums
            .iter()
            .flat_map(|e| e.members.iter().map(|&(name, span)| ("enum member", name, span)));

        params
            .chain(members)
            .filter_map(|(kind, name, span)| {
                let text = ctx.name(name);
                if text.starts_with('\\') || is_upper_camel_case(text) || is_all_caps(text) {
                    return None;
                }
                Some(Diagnostic::warning(
                    self.code(),
                    format!("{kind} `{text}` should be UpperCamelCase or ALL_CAPS"),
                    span,
                ))
            })
            .collect()
    }
}
