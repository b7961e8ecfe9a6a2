//! C203: Declaration alignment — names, dimensions, and types line up.

use svstyle_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use svstyle_parser::{PortStyle, SignalDecl};

use crate::helpers::same_region_type;
use crate::{LintContext, LintRule};

/// Checks that declarations on consecutive lines are aligned.
///
/// A run is a group of declarations on consecutive lines within one region:
/// the ANSI port list, the non-ANSI port declarations, or the body
/// declarations sharing a base type keyword. Within a run the names, the
/// closing `]` of packed dimensions, and (for ports) the type keywords must
/// each start in one column, the rightmost one used in the run. Only the first
/// declaration of a line takes part, and each line gets at most one
/// diagnostic.
pub struct DeclarationAlignment;

impl LintRule for DeclarationAlignment {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 203)
    }

    fn name(&self) -> &str {
        "declaration-alignment"
    }

    fn description(&self) -> &str {
        "declarations on consecutive lines are not aligned"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let module = ctx.module;
        let mut diags = Vec::new();

        let ports: Vec<&SignalDecl> = module.ports.iter().map(|p| &p.decl).collect();
        if module.port_style != PortStyle::None {
            self.check_region(ctx, &ports, true, &mut diags);
        }

        let mut groups: Vec<Vec<&SignalDecl>> = Vec::new();
        for decl in &module.decls {
            match groups
                .iter_mut()
                .find(|g| same_region_type(g[0].data_type, decl.data_type))
            {
                Some(group) => group.push(decl),
                None => groups.push(vec![decl]),
            }
        }
        for group in &groups {
            self.check_region(ctx, group, false, &mut diags);
        }

        diags
    }
}

/// One line's representative declaration with its measured columns.
struct Row<'a> {
    decl: &'a SignalDecl,
    line: u32,
    name_col: u32,
    dims_col: Option<u32>,
    type_col: Option<u32>,
}

impl DeclarationAlignment {
    fn check_region(
        &self,
        ctx: &LintContext<'_>,
        decls: &[&SignalDecl],
        ports: bool,
        diags: &mut Vec<Diagnostic>,
    ) {
        let mut rows: Vec<Row<'_>> = Vec::new();
        for decl in decls {
            let line = ctx.start_line(decl.name_span);
            if rows.last().is_some_and(|r| r.line == line) {
                continue;
            }
            rows.push(Row {
                decl,
                line,
                name_col: ctx.column(decl.name_span.start),
                dims_col: decl.dims_span.map(|s| ctx.column(s.end.saturating_sub(1))),
                type_col: decl.type_span.map(|s| ctx.column(s.start)),
            });
        }

        let mut start = 0;
        while start < rows.len() {
            let mut end = start + 1;
            while end < rows.len() && rows[end].line == rows[end - 1].line + 1 {
                end += 1;
            }
            if end - start > 1 {
                self.check_run(&rows[start..end], ports, diags);
            }
            start = end;
        }
    }

    fn check_run(&self, run: &[Row<'_>], ports: bool, diags: &mut Vec<Diagnostic>) {
        let name_max = run.iter().map(|r| r.name_col).max().unwrap_or(0);
        let dims_max = run.iter().filter_map(|r| r.dims_col).max();
        let type_max = run.iter().filter_map(|r| r.type_col).max();

        for row in run {
            let decl = row.decl;
            let misaligned = if row.name_col != name_max {
                Some(("name", row.name_col, name_max, decl.name_span))
            } else if let (Some(col), Some(max), Some(span)) = (row.dims_col, dims_max, decl.dims_span) {
                (col != max).then_some(("packed dimension", col, max, span))
            } else {
                None
            };
            let misaligned = misaligned.or_else(|| {
                let (col, max, span) = (row.type_col?, type_max?, decl.type_span?);
                (ports && col != max).then_some(("type", col, max, span))
            });

            if let Some((what, col, expected, span)) = misaligned {
                diags.push(
                    Diagnostic::warning(
                        self.code(),
                        format!("{what} is not aligned with the surrounding declarations"),
                        span,
                    )
                    .with_label(Label::primary(
                        span,
                        format!("column {col}, expected column {expected}"),
                    )),
                );
            }
        }
    }
}
