//! The reference scenarios, each run through the full lex → parse → check
//! pipeline with every rule enabled.

use svstyle_conformance::check_sv;
use svstyle_diagnostics::Severity;

#[test]
fn scenario_a_width_mismatch_is_not_truncation() {
    let src = "module top (
  output logic [7:0] data_o
);
  logic [3:0] a;
  assign data_o = a;
endmodule
";
    let result = check_sv(src);
    assert!(result.by_rule("naming-suffix").is_empty());
    assert!(result.by_rule("implicit-truncation").is_empty());
    assert!(!result.has_errors());
}

#[test]
fn scenario_b_missing_comb_default() {
    let src = "module m (input logic en_i);
  logic [2:0] value;
  always_comb begin
    if (en_i) value = 3'd5;
  end
endmodule
";
    let result = check_sv(src);
    let diags = result.by_rule("comb-default");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].location.line, 4);
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(result.error_count, 1);
}

const STATE_DECLS: &str = "module fsm (input logic clk_i);
  typedef enum logic [1:0] {Idle, Receive, Done} state_e;
  state_e     state;
  logic [1:0] x;
";

#[test]
fn scenario_c_partial_enum_coverage_warns() {
    let src = format!(
        "{STATE_DECLS}  always_comb begin
    x = 2'd0;
    unique case (state)
      Idle:    x = 2'd1;
      Receive: x = 2'd2;
    endcase
  end
endmodule
"
    );
    let result = check_sv(&src);
    let diags = result.by_rule("case-completeness");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].location.line, 7);
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn scenario_c_full_enum_coverage_is_silent() {
    let src = format!(
        "{STATE_DECLS}  always_comb begin
    x = 2'd0;
    unique case (state)
      Idle:    x = 2'd1;
      Receive: x = 2'd2;
      Done:    x = 2'd3;
    endcase
  end
endmodule
"
    );
    let result = check_sv(&src);
    assert!(result.by_rule("case-completeness").is_empty());
}

#[test]
fn scenario_d_blocking_assignments_in_always_ff() {
    let src = "module m (input logic clk, input logic rst_n);
  logic [3:0] counter;
  always_ff @(posedge clk or negedge rst_n) begin
    if (!rst_n) counter = 0;
    else counter = counter + 1;
  end
endmodule
";
    let result = check_sv(src);
    let diags = result.by_rule("assignment-kind");
    assert_eq!(diags.len(), 2);
    assert_eq!(result.lines_of("assignment-kind"), [4, 5]);
    assert!(diags.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn scenario_e_misaligned_declaration() {
    let src = "module m;
logic [7:0] bus_strb;
logic [31:0] bus_addr;
endmodule
";
    let result = check_sv(src);
    assert_eq!(result.lines_of("declaration-alignment"), [2]);
}
