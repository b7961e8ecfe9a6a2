//! Conformance test helpers for svstyle.
//!
//! Runs SystemVerilog source text through the whole pipeline (lex → parse →
//! check) and returns the sorted diagnostics for assertion in integration
//! tests.

#![warn(missing_docs)]

use svstyle_common::Interner;
use svstyle_config::LintConfig;
use svstyle_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use svstyle_lint::LintEngine;
use svstyle_source::SourceDb;

/// Result of running the pipeline over one or more files.
pub struct PipelineResult {
    /// All diagnostics, sorted by file, location, and rule.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    fn new(diagnostics: Vec<Diagnostic>) -> Self {
        let error_count = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warning_count = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        Self {
            diagnostics,
            error_count,
            warning_count,
        }
    }

    /// Returns `true` if any error-severity diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Diagnostics reported by the named rule.
    pub fn by_rule(&self, rule: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.rule == rule).collect()
    }

    /// Lines of the diagnostics reported by the named rule.
    pub fn lines_of(&self, rule: &str) -> Vec<u32> {
        self.by_rule(rule).iter().map(|d| d.location.line).collect()
    }

    /// Distinct rule names that reported anything, in first-seen order.
    pub fn rules(&self) -> Vec<&str> {
        let mut rules: Vec<&str> = Vec::new();
        for diag in &self.diagnostics {
            if !rules.contains(&diag.rule.as_str()) {
                rules.push(&diag.rule);
            }
        }
        rules
    }
}

/// Builds a [`LintConfig`] from deny and allow lists.
pub fn lint_config(deny: &[&str], allow: &[&str]) -> LintConfig {
    let mut config = LintConfig::default();
    config.deny_rules(deny);
    config.allow_rules(allow);
    config
}

/// Checks one file with every built-in rule at its default severity.
pub fn check_sv(source: &str) -> PipelineResult {
    check_with_engine(source, &LintEngine::with_defaults())
}

/// Checks one file with deny and allow overrides.
pub fn check_sv_with_lint(source: &str, deny: &[&str], allow: &[&str]) -> PipelineResult {
    check_with_engine(source, &LintEngine::new(&lint_config(deny, allow)))
}

/// Checks one file with a caller-built engine.
pub fn check_with_engine(source: &str, engine: &LintEngine) -> PipelineResult {
    check_files_with_engine(&[("test.sv", source)], engine)
}

/// Checks several files, each `(name, source)`, with the default engine.
///
/// Files are independent: each gets its own interner, as in the CLI.
pub fn check_sv_multifile(files: &[(&str, &str)]) -> PipelineResult {
    check_files_with_engine(files, &LintEngine::with_defaults())
}

fn check_files_with_engine(files: &[(&str, &str)], engine: &LintEngine) -> PipelineResult {
    let mut source_db = SourceDb::new();
    for (name, source) in files {
        source_db.add_source(*name, source.to_string());
    }
    let sink = DiagnosticSink::new();
    for file in source_db.files() {
        let interner = Interner::new();
        sink.extend(engine.check_source(file, &interner));
    }
    PipelineResult::new(sink.take_sorted())
}
