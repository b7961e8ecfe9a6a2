//! Style rules and the engine that runs them over parsed SystemVerilog.
//!
//! Every rule reads one [`ModuleTree`](svstyle_parser::ModuleTree) together
//! with the raw token stream of its file through a [`LintContext`], and
//! returns the diagnostics it finds. The [`LintEngine`] owns the rules,
//! applies the configured allow/deny/warn overrides, resolves locations, and
//! orders the result deterministically.
//!
//! # Rule Categories
//!
//! - **C-series (conventions):** naming suffixes, alignment, block delimiters,
//!   whitespace and line length
//! - **W-series (warnings):** operator choice, truncation, case completeness,
//!   sensitivity lists, legacy constructs
//! - **E-series (errors):** assignment-kind discipline and combinational defaults

#![warn(missing_docs)]

mod context;
mod engine;
mod helpers;
mod rules;

pub use context::LintContext;
pub use engine::{LintEngine, LEX_ERROR, PARSE_ERROR};
pub use helpers::{has_n_tag, is_all_caps, is_snake_case, is_upper_camel_case};
pub use rules::{builtin_rules, register_builtin_rules};
pub use rules::{
    ActiveLowSuffix, AssignmentKind, BlockDelimiter, CaseCompleteness, CombDefault,
    DanglingStatement, DeclarationAlignment, DqNaming, ImplicitTruncation, LegacyAlways,
    LineLength, LogicalOperator, NamingSuffix, ParameterCase, SensitivityList, TabCharacter,
    TrailingWhitespace,
};

use svstyle_diagnostics::{Diagnostic, DiagnosticCode, Severity};

/// A single style rule that checks one module.
///
/// Each rule has a unique diagnostic code, a short kebab-case name, a
/// description, and a default severity. Rules are pure: `check` only reads the
/// context and returns what it found, so the engine may run rules for the same
/// module concurrently.
pub trait LintRule: Send + Sync {
    /// Returns the diagnostic code for this rule (e.g., C201, E102).
    fn code(&self) -> DiagnosticCode;

    /// Returns the short kebab-case name of this rule (e.g., "naming-suffix").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule checks.
    fn description(&self) -> &str;

    /// Returns the severity used when no configuration overrides it.
    fn default_severity(&self) -> Severity;

    /// Checks a single module and returns the violations found.
    ///
    /// The engine stamps the rule name, location, and final severity onto
    /// the returned diagnostics.
    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic>;
}
