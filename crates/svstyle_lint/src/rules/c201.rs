//! C201: Naming suffix — port direction suffixes and lower_snake_case names.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity, SuggestedFix};
use svstyle_parser::strip_direction_suffix;

use crate::helpers::is_snake_case;
use crate::{LintContext, LintRule};

/// Checks port suffixes and the case of module, port, and signal names.
///
/// A port must end in `_i`, `_o`, or `_io` matching its direction. An
/// active-low (`_n`) or differential (`_p`/`_n`) tag folds into the suffix
/// without an underscore, so an active-low input is `rst_ni`, not `rst_n_i`.
/// The module name, ports, and internal signals are lower_snake_case.
/// Escaped identifiers are left alone.
pub struct NamingSuffix;

impl LintRule for NamingSuffix {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 201)
    }

    fn name(&self) -> &str {
        "naming-suffix"
    }

    fn description(&self) -> &str {
        "port lacks its direction suffix or a name is not lower_snake_case"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let module = ctx.module;
        let mut diags = Vec::new();

        let module_name = ctx.name(module.name);
        if !is_escaped(module_name) && !is_snake_case(module_name) {
            diags.push(Diagnostic::warning(
                self.code(),
                format!("module name `{module_name}` is not lower_snake_case"),
                module.name_span,
            ));
        }

        for port in &module.ports {
            let decl = &port.decl;
            let name = ctx.name(decl.name);
            if is_escaped(name) {
                continue;
            }
            let expected = port.expected_suffix(name);
            if !name.ends_with(&expected) {
                let suggestion = suggested_name(name, &expected);
                diags.push(
                    Diagnostic::warning(
                        self.code(),
                        format!(
                            "{} port `{name}` should end in `{expected}`",
                            port.direction().keyword()
                        ),
                        decl.name_span,
                    )
                    .with_label(Label::primary(decl.name_span, "missing direction suffix"))
                    .with_fix(SuggestedFix::replace(
                        format!("rename to `{suggestion}`"),
                        decl.name_span,
                        suggestion,
                    )),
                );
            } else if !is_snake_case(name) {
                diags.push(Diagnostic::warning(
                    self.code(),
                    format!("port `{name}` is not lower_snake_case"),
                    decl.name_span,
                ));
            }
        }

        for decl in &module.decls {
            let name = ctx.name(decl.name);
            if !is_escaped(name) && !is_snake_case(name) {
                diags.push(Diagnostic::warning(
                    self.code(),
                    format!("signal `{name}` is not lower_snake_case"),
                    decl.name_span,
                ));
            }
        }

        diags
    }
}

fn is_escaped(name: &str) -> bool {
    name.starts_with('\\')
}

/// Replaces whatever suffix and tag a name carries with `expected`.
fn suggested_name(name: &str, expected: &str) -> String {
    let base = strip_direction_suffix(name);
    let core = ["_nio", "_pio", "_ni", "_no", "_pi", "_po", "_n", "_p"]
        .iter()
        .find_map(|tag| base.strip_suffix(tag))
        .unwrap_or(base);
    format!("{core}{expected}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{lines, run_rule};

    #[test]
    fn rule_metadata() {
        assert_eq!(NamingSuffix.code().to_string(), "C201");
        assert_eq!(NamingSuffix.name(), "naming-suffix");
        assert_eq!(NamingSuffix.default_severity(), Severity::Warning);
    }

    #[test]
    fn well_named_ports_pass() {
        let diags = run_rule(
            &NamingSuffix,
            "module counter (
               input  logic       clk_i,
               input  logic       rst_ni,
               inout  wire        sda_io,
               output logic       lvds_po,
               output logic [7:0] data_o
             );
               logic [7:0] count_q;
             endmodule",
        );
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn output_with_suffix_passes() {
        let diags = run_rule(
            &NamingSuffix,
            "module top (output logic [7:0] data_o, input logic [3:0] a_i);
               assign data_o = a_i;
             endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn missing_suffix_is_reported_with_fix() {
        let diags = run_rule(&NamingSuffix, "module m (\n  input logic clk\n);\nendmodule");
        assert_eq!(diags.len(), 1);
        assert_eq!(lines(&diags), [2]);
        assert_eq!(diags[0].message, "input port `clk` should end in `_i`");
        let fix = diags[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacements[0].new_text, "clk_i");
    }

    #[test]
    fn wrong_direction_suffix() {
        let diags = run_rule(&NamingSuffix, "module m (output logic valid_i);\nendmodule");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].fix.as_ref().unwrap().replacements[0].new_text, "valid_o");
    }

    #[test]
    fn separated_active_low_tag() {
        let diags = run_rule(
            &NamingSuffix,
            "module m (input logic rst_n_i, input logic en_n);\nendmodule",
        );
        let fixes: Vec<_> = diags
            .iter()
            .map(|d| d.fix.as_ref().unwrap().replacements[0].new_text.clone())
            .collect();
        assert_eq!(fixes, ["rst_ni", "en_ni"]);
        assert_eq!(diags[0].message, "input port `rst_n_i` should end in `_ni`");
    }

    #[test]
    fn case_violations() {
        let diags = run_rule(
            &NamingSuffix,
            "module MyTop (input logic Clk_i);\n  logic dataReg;\n  logic ok_sig;\nendmodule",
        );
        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "module name `MyTop` is not lower_snake_case",
                "port `Clk_i` is not lower_snake_case",
                "signal `dataReg` is not lower_snake_case",
            ]
        );
    }

    #[test]
    fn non_ansi_ports_are_checked() {
        let diags = run_rule(
            &NamingSuffix,
            "module m (clk_i, q);\n  input clk_i;\n  output [3:0] q;\nendmodule",
        );
        assert_eq!(lines(&diags), [3]);
    }

    #[test]
    fn escaped_identifiers_are_skipped() {
        let diags = run_rule(&NamingSuffix, "module \\Weird+Name (input logic \\clk );\nendmodule");
        assert!(diags.is_empty());
    }

    #[test]
    fn suggestions() {
        assert_eq!(suggested_name("data", "_o"), "data_o");
        assert_eq!(suggested_name("data_io", "_i"), "data_i");
        assert_eq!(suggested_name("en_no", "_ni"), "en_ni");
        assert_eq!(suggested_name("pad_nio", "_nio"), "pad_nio");
    }
}
