//! Lexer and engine properties that hold for any input.

use svstyle_config::LintConfig;
use svstyle_conformance::check_with_engine;
use svstyle_lint::{builtin_rules, LintEngine};
use svstyle_parser::{lex, SvToken};
use svstyle_source::FileId;

const CORPUS: &[&str] = &[
    "module counter #(
  parameter int Width = 8
) (
  input  logic             clk_i,
  input  logic             rst_ni,
  output logic [Width-1:0] count_o
);
  logic [Width-1:0] count_d, count_q;

  always_comb begin
    count_d = count_q + 1'b1;
  end

  always_ff @(posedge clk_i or negedge rst_ni) begin
    if (!rst_ni) count_q <= '0;
    else         count_q <= count_d;
  end

  assign count_o = count_q;
endmodule
",
    "`timescale 1ns/1ps
// line comment
/* block
   comment */
module \\weird$name (input logic a_i);
  localparam logic [15:0] Magic = 16'hDEAD;
  initial $display(\"tab\\t%h\", Magic);
endmodule\r\n",
    "module Legacy (clk, rst, d, q);\n\tinput clk;   \n  input rst;\n  output q;\n  reg q;\n  always @(posedge clk)\n    if (rst) q <= 1'b0;\n    else q <= d;\nendmodule",
    "",
    "   \n\n",
];

#[test]
fn token_spans_reconstruct_the_source() {
    for src in CORPUS {
        let tokens = lex(src, FileId::from_raw(0)).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text(src)).collect();
        assert_eq!(&rebuilt, src);

        let mut expected_start = 0;
        for token in &tokens {
            assert_eq!(token.span.start, expected_start, "gap before {:?}", token.kind);
            expected_start = token.span.end;
        }
        assert_eq!(expected_start as usize, src.len());
        assert_eq!(tokens.last().map(|t| t.kind), Some(SvToken::Eof));
    }
}

#[test]
fn relexing_token_text_is_idempotent() {
    for src in CORPUS {
        let tokens = lex(src, FileId::from_raw(0)).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text(src)).collect();
        let again = lex(&rebuilt, FileId::from_raw(0)).unwrap();
        assert_eq!(tokens, again);
    }
}

#[test]
fn rule_order_does_not_change_results() {
    let forward = LintEngine::with_defaults();
    let mut reversed = LintEngine::empty(&LintConfig::default());
    for rule in builtin_rules().into_iter().rev() {
        reversed.register(rule);
    }
    assert_eq!(forward.rule_count(), reversed.rule_count());

    for src in CORPUS {
        let a = check_with_engine(src, &forward);
        let b = check_with_engine(src, &reversed);
        assert_eq!(a.diagnostics, b.diagnostics);
    }
}

#[test]
fn checking_twice_gives_the_same_result() {
    let engine = LintEngine::with_defaults();
    for src in CORPUS {
        assert_eq!(
            check_with_engine(src, &engine).diagnostics,
            check_with_engine(src, &engine).diagnostics
        );
    }
}

#[test]
fn diagnostics_are_sorted_by_location() {
    let engine = LintEngine::with_defaults();
    for src in CORPUS {
        let diags = check_with_engine(src, &engine).diagnostics;
        assert!(diags
            .windows(2)
            .all(|w| (w[0].location, &w[0].rule) <= (w[1].location, &w[1].rule)));
    }
}
