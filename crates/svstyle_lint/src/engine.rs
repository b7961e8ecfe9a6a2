//! Lint engine that manages rule registration, configuration, and execution.
//!
//! The `LintEngine` accepts a `LintConfig` to control which rules are
//! allowed, denied, or warned, runs every enabled rule over a module, and
//! stamps the results with the rule name, a resolved location, and the
//! configured severity.

use std::collections::HashSet;

use rayon::prelude::*;
use svstyle_common::Interner;
use svstyle_config::{LintConfig, StyleOptions};
use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Location, Severity};
use svstyle_parser::{lex, lex_best_effort, parse, LexError, ParseError, Token};
use svstyle_source::{SourceFile, Span};

use crate::rules::register_builtin_rules;
use crate::{LintContext, LintRule};

/// Code reported for lexical errors.
pub const LEX_ERROR: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);

/// Code reported for structural parse errors.
pub const PARSE_ERROR: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);

/// The lint engine that orchestrates running rules on parsed modules.
///
/// Configuration entries may name a rule (`naming-suffix`) or its code
/// (`C201`, case-insensitive). `allow` wins over `deny`, which wins over
/// `warn`.
pub struct LintEngine {
    /// All registered rules, in registration order.
    rules: Vec<Box<dyn LintRule>>,
    /// Rule names and codes promoted to error severity.
    denied: HashSet<String>,
    /// Rule names and codes that are not run.
    allowed: HashSet<String>,
    /// Rule names and codes demoted to warning severity.
    warned: HashSet<String>,
    /// Thresholds passed to every context built by [`check_source`](Self::check_source).
    options: StyleOptions,
    /// Whether lexical errors are recovered from instead of aborting the file.
    best_effort: bool,
}

impl LintEngine {
    /// Creates a lint engine configured by the given `LintConfig`.
    ///
    /// All built-in rules are registered automatically.
    pub fn new(config: &LintConfig) -> Self {
        let mut engine = Self {
            rules: Vec::new(),
            denied: normalize(&config.deny),
            allowed: normalize(&config.allow),
            warned: normalize(&config.warn),
            options: StyleOptions::default(),
            best_effort: false,
        };
        register_builtin_rules(&mut engine);
        engine
    }

    /// Creates a lint engine with default configuration (no overrides).
    pub fn with_defaults() -> Self {
        Self::new(&LintConfig::default())
    }

    /// Creates an engine with the given configuration and no rules.
    pub fn empty(config: &LintConfig) -> Self {
        Self {
            rules: Vec::new(),
            denied: normalize(&config.deny),
            allowed: normalize(&config.allow),
            warned: normalize(&config.warn),
            options: StyleOptions::default(),
            best_effort: false,
        }
    }

    /// Sets the style options used by [`check_source`](Self::check_source).
    pub fn with_options(mut self, options: StyleOptions) -> Self {
        self.options = options;
        self
    }

    /// Makes [`check_source`](Self::check_source) keep going after lexical
    /// errors.
    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    /// Registers a rule with the engine.
    pub fn register(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Iterates over the registered rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// The severity a rule's diagnostics are reported at, or `None` when the
    /// rule is allowed (suppressed).
    pub fn severity_for(&self, rule: &dyn LintRule) -> Option<Severity> {
        let code = rule.code().to_string();
        let listed = |set: &HashSet<String>| set.contains(rule.name()) || set.contains(&code);
        if listed(&self.allowed) {
            None
        } else if listed(&self.denied) {
            Some(Severity::Error)
        } else if listed(&self.warned) {
            Some(Severity::Warning)
        } else {
            Some(rule.default_severity())
        }
    }

    /// Runs all enabled rules on one module.
    ///
    /// Rules run in parallel. Each diagnostic is stamped with its rule name,
    /// the line and column of its primary span, and the configured severity.
    /// The result is stable-sorted by (line, column, rule).
    pub fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diags: Vec<Diagnostic> = self
            .rules
            .par_iter()
            .filter_map(|rule| Some((rule.as_ref(), self.severity_for(rule.as_ref())?)))
            .flat_map_iter(|(rule, severity)| {
                rule.check(ctx)
                    .into_iter()
                    .map(move |diag| stamp(diag, rule, severity, ctx.file))
            })
            .collect();
        sort_diagnostics(&mut diags);
        tracing::trace!(
            module = ctx.name(ctx.module.name),
            count = diags.len(),
            "checked module"
        );
        diags
    }

    /// Lexes, parses, and checks a whole file.
    ///
    /// Lexical errors become `lex-error` diagnostics; in strict mode the
    /// first one ends the file. Structural errors become `parse-error`
    /// diagnostics and the modules that did parse are still checked.
    pub fn check_source(&self, file: &SourceFile, interner: &Interner) -> Vec<Diagnostic> {
        let (tokens, lex_errors): (Vec<Token>, Vec<LexError>) = if self.best_effort {
            lex_best_effort(&file.content, file.id)
        } else {
            match lex(&file.content, file.id) {
                Ok(tokens) => (tokens, Vec::new()),
                Err(err) => {
                    tracing::debug!(path = %file.path.display(), %err, "lexing failed");
                    return vec![lex_diagnostic(&err)];
                }
            }
        };

        let output = parse(&tokens, &file.content, interner);
        tracing::debug!(
            path = %file.path.display(),
            tokens = tokens.len(),
            modules = output.modules.len(),
            errors = output.errors.len() + lex_errors.len(),
            "parsed file"
        );

        let mut diags: Vec<Diagnostic> = lex_errors.iter().map(lex_diagnostic).collect();
        diags.extend(output.errors.iter().map(parse_diagnostic));
        for module in &output.modules {
            let ctx = LintContext::new(module, &tokens, file, interner, &self.options);
            diags.extend(self.check(&ctx));
        }
        sort_diagnostics(&mut diags);
        diags
    }
}

fn normalize(entries: &[String]) -> HashSet<String> {
    entries
        .iter()
        .map(|entry| match entry.parse::<DiagnosticCode>() {
            Ok(code) => code.to_string(),
            Err(()) => entry.clone(),
        })
        .collect()
}

fn stamp(diag: Diagnostic, rule: &dyn LintRule, severity: Severity, file: &SourceFile) -> Diagnostic {
    let location = location_of(file, diag.primary_span);
    diag.with_rule(rule.name())
        .at(location)
        .with_severity(severity)
}

fn location_of(file: &SourceFile, span: Span) -> Location {
    let (line, column) = file.line_col(span.start);
    Location::new(line, column)
}

fn sort_diagnostics(diags: &mut [Diagnostic]) {
    diags.sort_by(|a, b| (a.location, &a.rule).cmp(&(b.location, &b.rule)));
}

fn lex_diagnostic(err: &LexError) -> Diagnostic {
    Diagnostic::error(LEX_ERROR, err.kind.to_string(), err.span)
        .with_rule("lex-error")
        .at(Location::new(err.line, err.column))
}

fn parse_diagnostic(err: &ParseError) -> Diagnostic {
    Diagnostic::error(PARSE_ERROR, err.message.clone(), err.span)
        .with_rule("parse-error")
        .at(Location::new(err.line, err.column))
}
