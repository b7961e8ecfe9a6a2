//! Diagnostic model shared by the lexer, parser, and style rules.
//!
//! A [`Diagnostic`] records which rule fired, where, how severe it is, and a
//! human-readable message, optionally with labels, notes, and a
//! [`SuggestedFix`]. Diagnostics are never edited after a rule returns them;
//! the [`DiagnosticSink`] collects them from parallel workers, collapses
//! duplicates, and filters by severity, and a [`DiagnosticRenderer`] turns
//! them into terminal text or JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;
pub mod suggested_fix;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Location};
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::{filter_by_severity, DiagnosticSink};
pub use suggested_fix::{Replacement, SuggestedFix};
