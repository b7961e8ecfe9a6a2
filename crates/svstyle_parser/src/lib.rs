//! Lexer and structural parser for SystemVerilog style checking.
//!
//! The lexer is lossless: every character of the input belongs to exactly
//! one token, trivia included, so rules can inspect whitespace and comments.
//! The parser builds a [`ModuleTree`] per module and keeps everything it does
//! not model (generate regions, instances, tasks, assertions, interfaces,
//! packages) as opaque spans.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): strict [`lex`] and recovering [`lex_best_effort`].
//! - **Parser** ([`parse`]): recursive descent over significant tokens with
//!   Pratt expression parsing and per-item error recovery.
//! - **Tree** ([`tree`], [`expr`]): the structural model the lint rules read.

#![warn(missing_docs)]

mod decl;
mod error;
/// Expression trees and the Pratt expression parser.
pub mod expr;
/// Lexical analyzer for SystemVerilog source text.
pub mod lexer;
/// Recursive descent parser with error recovery.
pub mod parser;
mod stmt;
/// Token types for the SystemVerilog lexer.
pub mod token;
pub mod tree;

pub use error::{LexError, LexErrorKind, ParseError};
pub use expr::{BinaryOp, Expr, LiteralKind, Select, UnaryOp};
pub use lexer::{lex, lex_best_effort};
pub use parser::{parse, ParseOutput};
pub use token::{SvToken, Token, TokenCategory};
pub use tree::*;

#[cfg(test)]
mod tests {
    use super::*;
    use svstyle_common::Interner;
    use svstyle_source::FileId;

    fn parse_ok(source: &str) -> (Vec<ModuleTree>, Interner) {
        let interner = Interner::new();
        let tokens = lex(source, FileId::from_raw(0)).unwrap();
        let out = parse(&tokens, source, &interner);
        assert!(
            out.errors.is_empty(),
            "unexpected errors: {:?}",
            out.errors.iter().map(|e| &e.message).collect::<Vec<_>>()
        );
        (out.modules, interner)
    }

    #[test]
    fn integration_counter() {
        let (modules, _) = parse_ok(
            "module counter #(parameter int Width = 8)(
                input  logic             clk_i,
                input  logic             rst_ni,
                input  logic             en_i,
                output logic [Width-1:0] count_o
            );
                logic [Width-1:0] count_d, count_q;
                assign count_o = count_q;
                always_comb begin
                    count_d = count_q;
                    if (en_i) count_d = count_q + 1;
                end
                always_ff @(posedge clk_i or negedge rst_ni) begin
                    if (!rst_ni) count_q <= '0;
                    else         count_q <= count_d;
                end
            endmodule",
        );
        assert_eq!(modules.len(), 1);
        let m = &modules[0];
        assert_eq!(m.port_style, PortStyle::Ansi);
        assert_eq!(m.params.len(), 1);
        assert_eq!(m.ports.len(), 4);
        assert_eq!(m.decls.len(), 2);
        assert_eq!(m.assigns.len(), 1);
        assert_eq!(m.procedures.len(), 2);
        assert!(m.opaque.is_empty());
    }

    #[test]
    fn integration_fsm_with_enum() {
        let (modules, interner) = parse_ok(
            "module fsm (
                input  logic clk_i, rst_ni, start_i,
                output logic done_o
            );
                typedef enum logic [1:0] {Idle, Run, Stop} state_e;
                state_e state_d, state_q;

                always_comb begin
                    state_d = state_q;
                    unique case (state_q)
                        Idle: if (start_i) state_d = Run;
                        Run:  state_d = Stop;
                        Stop: state_d = Idle;
                    endcase
                end
                assign done_o = (state_q == Stop);
            endmodule",
        );
        let m = &modules[0];
        assert_eq!(m.ports.len(), 4);
        let state = m.lookup(interner.get("state_q").unwrap()).unwrap();
        let ty = m.enum_of(state).unwrap();
        assert_eq!(ty.members.len(), 3);
        let Statement::Case(case) = &m.procedures[0].body.statements[1] else {
            panic!("expected case");
        };
        assert_eq!(case.qualifier, Some(Qualifier::Unique));
        assert_eq!(case.default, None);
    }

    #[test]
    fn integration_generate_and_instances_are_opaque() {
        let (modules, _) = parse_ok(
            "module gen_test #(parameter int N = 4)(
                input  logic         clk_i,
                input  logic [N-1:0] din_i,
                output logic [N-1:0] dout_o
            );
                genvar i;
                generate
                    for (i = 0; i < N; i = i + 1) begin : gen_ff
                        always_ff @(posedge clk_i)
                            dout_o[i] <= din_i[i];
                    end
                endgenerate
                sub u_sub (.clk_i, .d_i(din_i[0]));
            endmodule",
        );
        let m = &modules[0];
        assert!(m.procedures.is_empty());
        assert_eq!(m.opaque.len(), 3);
    }

    #[test]
    fn integration_package_interface_and_module() {
        let (modules, _) = parse_ok(
            "package my_pkg;
                parameter int Width = 8;
                function int max(input int a, input int b);
                    return (a > b) ? a : b;
                endfunction
            endpackage

            interface axi_if;
                logic valid;
                modport master(output valid);
            endinterface

            module producer import my_pkg::*; (axi_if.master bus, input logic clk_i);
            endmodule",
        );
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].imports.len(), 1);
        assert_eq!(modules[0].ports.len(), 1);
    }

    #[test]
    fn integration_error_recovery() {
        let interner = Interner::new();
        let src = "module bad;\n  wire ;\nendmodule\n\nmodule good(input logic clk_i);\n  logic [7:0] data;\nendmodule";
        let tokens = lex(src, FileId::from_raw(0)).unwrap();
        let out = parse(&tokens, src, &interner);
        assert_eq!(out.modules.len(), 2);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].to_string(), "2:8: expected identifier, found `;`");
        assert_eq!(out.modules[1].decls.len(), 1);
    }

    #[test]
    fn integration_serde_roundtrip() {
        let (modules, _) = parse_ok(
            "module top(input logic clk_i, output logic [7:0] data_o);
                assign data_o = 8'hFF;
            endmodule",
        );
        let json = serde_json::to_string(&modules).unwrap();
        let back: Vec<ModuleTree> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, modules);
    }
}
