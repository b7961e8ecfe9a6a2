//! The read-only view of one module handed to every rule.

use svstyle_common::{Ident, Interner};
use svstyle_config::StyleOptions;
use svstyle_parser::{Block, ModuleTree, Token};
use svstyle_source::{SourceFile, Span};

/// Everything a rule may look at while checking one module.
///
/// The context borrows the structural tree, the complete token stream of the
/// file (trivia included), the source text, and the interner the tree's
/// identifiers live in. It is `Sync`, so rules can share it across threads.
#[derive(Clone, Copy)]
pub struct LintContext<'a> {
    /// The module being checked.
    pub module: &'a ModuleTree,
    /// All tokens of the file, in source order.
    pub tokens: &'a [Token],
    /// The file the module was parsed from.
    pub file: &'a SourceFile,
    /// The interner holding the tree's identifiers.
    pub interner: &'a Interner,
    /// Thresholds for the formatting rules.
    pub options: &'a StyleOptions,
}

impl<'a> LintContext<'a> {
    /// Creates a context for one module of `file`.
    pub fn new(
        module: &'a ModuleTree,
        tokens: &'a [Token],
        file: &'a SourceFile,
        interner: &'a Interner,
        options: &'a StyleOptions,
    ) -> Self {
        Self {
            module,
            tokens,
            file,
            interner,
            options,
        }
    }

    /// Resolves an identifier to its spelling.
    pub fn name(&self, ident: Ident) -> &'a str {
        self.interner.resolve(ident)
    }

    /// The source text a span covers.
    pub fn text(&self, span: Span) -> &'a str {
        self.file.snippet(span.start, span.end)
    }

    /// The 1-based line of a byte offset.
    pub fn line(&self, offset: u32) -> u32 {
        self.file.line_of(offset)
    }

    /// The 1-based character column of a byte offset.
    pub fn column(&self, offset: u32) -> u32 {
        self.file.line_col(offset).1
    }

    /// The line a span starts on.
    pub fn start_line(&self, span: Span) -> u32 {
        self.line(span.start)
    }

    /// The line holding the last character of a span.
    pub fn end_line(&self, span: Span) -> u32 {
        self.line(span.end.saturating_sub(1).max(span.start))
    }

    /// The tokens inside the module, from `module` through `endmodule`.
    pub fn module_tokens(&self) -> &'a [Token] {
        let span = self.module.span;
        let first = self.tokens.partition_point(|t| t.span.start < span.start);
        let last = self.tokens.partition_point(|t| t.span.start < span.end);
        &self.tokens[first..last]
    }

    /// Procedure bodies followed by function bodies.
    pub fn bodies(&self) -> impl Iterator<Item = &'a Block> + 'a {
        let module = self.module;
        module
            .procedures
            .iter()
            .map(|p| &p.body)
            .chain(module.functions.iter().map(|f| &f.body))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::LintRule;
    use svstyle_diagnostics::{Diagnostic, Location};
    use svstyle_parser::{lex, parse};
    use svstyle_source::FileId;

    /// Runs one rule over every module of `source` with default options.
    pub(crate) fn run_rule(rule: &dyn LintRule, source: &str) -> Vec<Diagnostic> {
        run_rule_with(rule, source, &StyleOptions::default())
    }

    /// Runs one rule with explicit options. Diagnostics come back with their
    /// locations resolved and sorted by position.
    pub(crate) fn run_rule_with(
        rule: &dyn LintRule,
        source: &str,
        options: &StyleOptions,
    ) -> Vec<Diagnostic> {
        let file = SourceFile::new(FileId::from_raw(0), "test.sv".into(), source.to_string());
        let interner = Interner::new();
        let tokens = lex(&file.content, file.id).unwrap();
        let out = parse(&tokens, &file.content, &interner);
        assert!(
            out.errors.is_empty(),
            "unexpected parse errors: {:?}",
            out.errors.iter().map(ToString::to_string).collect::<Vec<_>>()
        );
        let mut diags: Vec<Diagnostic> = out
            .modules
            .iter()
            .flat_map(|m| rule.check(&LintContext::new(m, &tokens, &file, &interner, options)))
            .map(|d| {
                let (line, column) = file.line_col(d.primary_span.start);
                d.at(Location::new(line, column))
            })
            .collect();
        diags.sort_by_key(|d| d.location);
        diags
    }

    /// The line of every diagnostic.
    pub(crate) fn lines(diags: &[Diagnostic]) -> Vec<u32> {
        diags.iter().map(|d| d.location.line).collect()
    }
}
