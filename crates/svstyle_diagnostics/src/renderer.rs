//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use crate::severity::Severity;
use serde::Serialize;
use svstyle_source::SourceDb;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;

    /// Renders a batch of diagnostics.
    ///
    /// The default concatenates [`render`](Self::render) output.
    fn render_all(&self, diags: &[Diagnostic], source_db: &SourceDb) -> String {
        diags.iter().map(|d| self.render(d, source_db)).collect()
    }
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E102]: blocking assignment `=` in always_ff
///   --> rtl/counter.sv:4:28
///    |
///  4 |   if (!rst_ni) counter_q = '0;
///    |                ^^^^^^^^^^^^^^^ use `<=`
///    |
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, ansi: &str) -> String {
        if self.color {
            format!("\x1b[{ansi}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Note => "1;32",
            Severity::Help => "1;36",
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();

        let head = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(&head, Self::severity_color(diag.severity)),
            self.paint(&diag.message, "1")
        ));

        if !diag.primary_span.is_dummy() {
            let file = source_db.get_file(diag.primary_span.file);
            let (line, col) = file.line_col(diag.primary_span.start);
            out.push_str(&format!(
                "  --> {}:{}:{}\n",
                file.path.display(),
                line,
                col
            ));

            let line_num = line.to_string();
            let padding = " ".repeat(line_num.len());
            let line_text = file.line_text(line);

            // The caret run stops at the end of the first line of the span.
            let (end_line, end_col) = file.line_col(diag.primary_span.end);
            let width = if end_line == line {
                end_col.saturating_sub(col).max(1)
            } else {
                (line_text.chars().count() as u32 + 1).saturating_sub(col).max(1)
            };
            let carets = "^".repeat(width as usize);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_text}\n"));
            out.push_str(&format!(
                "{padding} | {col_padding}{}\n",
                self.paint(
                    &format!("{carets}{primary_msg}"),
                    Self::severity_color(diag.severity)
                )
            ));

            for label in diag
                .labels
                .iter()
                .filter(|l| l.style == LabelStyle::Secondary && !l.span.is_dummy())
            {
                let resolved = source_db.resolve_span(label.span);
                out.push_str(&format!("{padding} = {resolved}: {}\n", label.message));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        if let Some(fix) = &diag.fix {
            out.push_str(&format!("   = suggestion: {}\n", fix.message));
        }

        out
    }
}

/// Renders diagnostics as JSON for machine consumption.
///
/// [`render`](DiagnosticRenderer::render) emits one object per line;
/// [`render_all`](DiagnosticRenderer::render_all) emits a single JSON array.
pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonRecord<'a> {
    file: String,
    line: u32,
    column: u32,
    rule: &'a str,
    code: String,
    severity: Severity,
    message: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    notes: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    help: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a str>,
}

impl JsonRenderer {
    fn record<'a>(diag: &'a Diagnostic, source_db: &SourceDb) -> JsonRecord<'a> {
        let file = if diag.primary_span.is_dummy() {
            String::new()
        } else {
            source_db
                .get_file(diag.primary_span.file)
                .path
                .display()
                .to_string()
        };
        JsonRecord {
            file,
            line: diag.location.line,
            column: diag.location.column,
            rule: &diag.rule,
            code: diag.code.to_string(),
            severity: diag.severity,
            message: &diag.message,
            notes: &diag.notes,
            help: &diag.help,
            fix: diag.fix.as_ref().map(|f| f.message.as_str()),
        }
    }
}

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut line = serde_json::to_string(&Self::record(diag, source_db))
            .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"));
        line.push('\n');
        line
    }

    fn render_all(&self, diags: &[Diagnostic], source_db: &SourceDb) -> String {
        let records: Vec<_> = diags.iter().map(|d| Self::record(d, source_db)).collect();
        let mut out = serde_json::to_string_pretty(&records)
            .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::diagnostic::Location;
    use crate::label::Label;
    use svstyle_source::Span;

    fn e102(db: &mut SourceDb) -> Diagnostic {
        let id = db.add_source(
            "counter.sv",
            "always_ff @(posedge clk_i) begin\n  count_q = count_d;\nend\n".to_string(),
        );
        let span = Span::new(id, 35, 52);
        Diagnostic::error(
            DiagnosticCode::new(Category::Error, 102),
            "blocking assignment in always_ff",
            span,
        )
        .with_rule("assignment-kind")
        .at(Location::new(2, 3))
        .with_label(Label::primary(span, "use `<=`"))
    }

    #[test]
    fn terminal_shows_location_and_source() {
        let mut db = SourceDb::new();
        let diag = e102(&mut db);
        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(out.contains("error[E102]: blocking assignment in always_ff"));
        assert!(out.contains("--> counter.sv:2:3"));
        assert!(out.contains("2 |   count_q = count_d;"));
        let carets = format!("|   {} use `<=`", "^".repeat(17));
        assert!(out.contains(&carets));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn terminal_color_uses_ansi() {
        let mut db = SourceDb::new();
        let diag = e102(&mut db);
        let out = TerminalRenderer::new(true).render(&diag, &db);
        assert!(out.contains("\x1b[1;31m"));
    }

    #[test]
    fn terminal_notes_and_help() {
        let db = SourceDb::new();
        let diag = Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 106),
            "plain `always` block",
            Span::DUMMY,
        )
        .with_note("intent is unclear")
        .with_help("use always_comb or always_ff");
        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(out.contains("warning[W106]: plain `always` block"));
        assert!(out.contains("= note: intent is unclear"));
        assert!(out.contains("= help: use always_comb or always_ff"));
        assert!(!out.contains("-->"));
    }

    #[test]
    fn json_record_fields() {
        let mut db = SourceDb::new();
        let diag = e102(&mut db);
        let out = JsonRenderer.render(&diag, &db);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["file"], "counter.sv");
        assert_eq!(value["line"], 2);
        assert_eq!(value["column"], 3);
        assert_eq!(value["rule"], "assignment-kind");
        assert_eq!(value["code"], "E102");
        assert_eq!(value["severity"], "error");
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn json_render_all_is_array() {
        let mut db = SourceDb::new();
        let diag = e102(&mut db);
        let out = JsonRenderer.render_all(&[diag.clone(), diag], &db);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
