//! `svstyle lint` — the checking pipeline.
//!
//! 1. Load `svstyle.toml` (or the defaults) and merge `--allow`/`--deny`
//! 2. Discover source files under the given paths
//! 3. Lex, parse, and check every file in parallel
//! 4. Filter by severity and render diagnostics

use std::path::PathBuf;

use svstyle_config::{LintConfig, StyleConfig};
use svstyle_diagnostics::{
    filter_by_severity, Diagnostic, DiagnosticRenderer, JsonRenderer, Severity, TerminalRenderer,
};
use svstyle_lint::LintEngine;
use tracing::debug;

use crate::pipeline::{check_all, discover_source_files, load_sources, load_style_config};
use crate::{GlobalArgs, LintArgs, ReportFormat};

/// Runs the `svstyle lint` command.
///
/// Returns exit code 1 if any error-severity diagnostic is reported, 0
/// otherwise.
pub fn run(args: &LintArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_style_config(global)?;
    let engine = build_engine(&config, args);

    let roots = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths.clone()
    };
    let files = discover_source_files(&roots, &config.files)?;
    debug!(count = files.len(), rules = engine.rule_count(), "discovered source files");

    if files.is_empty() {
        if !global.quiet {
            eprintln!("warning: no source files found");
        }
        return Ok(0);
    }

    let db = load_sources(&files)?;
    let diagnostics = filter_by_severity(check_all(&db, &engine), args.min_severity.into());

    match args.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            eprint!("{}", renderer.render_all(&diagnostics, &db));
        }
        ReportFormat::Json => {
            print!("{}", JsonRenderer.render_all(&diagnostics, &db));
        }
    }

    let (errors, warnings) = count(&diagnostics);
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Checked {} file(s): {errors} error(s), {warnings} warning(s)",
            files.len()
        );
    }

    Ok(if errors > 0 { 1 } else { 0 })
}

/// Builds the engine from the file configuration with the command-line
/// overrides applied.
fn build_engine(config: &StyleConfig, args: &LintArgs) -> LintEngine {
    let lint = merge_lint_config(&config.lint, args);
    LintEngine::new(&lint)
        .with_options(config.style.clone())
        .with_best_effort(args.best_effort)
}

/// Applies `--deny` then `--allow` on top of the file's lint section.
///
/// A rule named on the command line is removed from the other lists, so the
/// command line always wins over the file.
fn merge_lint_config(config: &LintConfig, args: &LintArgs) -> LintConfig {
    let mut merged = config.clone();
    merged.deny_rules(&args.deny);
    merged.allow_rules(&args.allow);
    merged
}

fn count(diagnostics: &[Diagnostic]) -> (usize, usize) {
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MinSeverity;
    use std::fs;
    use std::path::Path;
    use svstyle_config::CONFIG_FILE_NAME;
    use tempfile::TempDir;

    const CLEAN: &str = "module counter (
  input  logic       clk_i,
  input  logic       rst_ni,
  output logic [3:0] count_o
);
  logic [3:0] count_d, count_q;

  always_comb begin
    count_d = count_q + 4'd1;
  end

  always_ff @(posedge clk_i or negedge rst_ni) begin
    if (!rst_ni) count_q <= '0;
    else         count_q <= count_d;
  end

  assign count_o = count_q;
endmodule
";

    const BLOCKING_FF: &str = "module m (input logic clk_i, input logic d_i);
  logic q;
  always_ff @(posedge clk_i) q = d_i;
endmodule
";

    fn args(paths: &[&Path]) -> LintArgs {
        LintArgs {
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            allow: vec![],
            deny: vec![],
            format: ReportFormat::Text,
            min_severity: MinSeverity::Warning,
            best_effort: false,
        }
    }

    fn global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(dir.to_path_buf()),
        }
    }

    fn project(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();
        for (name, content) in files {
            fs::write(tmp.path().join(name), content).unwrap();
        }
        tmp
    }

    #[test]
    fn clean_design_exits_zero() {
        let tmp = project(&[("counter.sv", CLEAN)]);
        let code = run(&args(&[tmp.path()]), &global(tmp.path())).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn errors_exit_one() {
        let tmp = project(&[("m.sv", BLOCKING_FF)]);
        let code = run(&args(&[tmp.path()]), &global(tmp.path())).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn allowing_the_rule_clears_the_error() {
        let tmp = project(&[("m.sv", BLOCKING_FF)]);
        let mut lint_args = args(&[tmp.path()]);
        lint_args.allow = vec!["assignment-kind".to_string()];
        let code = run(&lint_args, &global(tmp.path())).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn config_file_demotion_is_honored() {
        let tmp = project(&[("m.sv", BLOCKING_FF)]);
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[lint]\nwarn = [\"E102\"]\n",
        )
        .unwrap();
        let code = run(&args(&[tmp.path()]), &global(tmp.path())).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn deny_promotes_warnings() {
        let src = "module m (input logic a_i);\n  logic y;\n  always @* y = a_i;\nendmodule\n";
        let tmp = project(&[("m.sv", src)]);
        assert_eq!(run(&args(&[tmp.path()]), &global(tmp.path())).unwrap(), 0);

        let mut lint_args = args(&[tmp.path()]);
        lint_args.deny = vec!["legacy-always".to_string()];
        assert_eq!(run(&lint_args, &global(tmp.path())).unwrap(), 1);
    }

    #[test]
    fn lex_error_fails_the_file() {
        let tmp = project(&[("bad.sv", "module m;\n  logic ¤ x;\nendmodule\n")]);
        let code = run(&args(&[tmp.path()]), &global(tmp.path())).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn empty_directory_exits_zero() {
        let tmp = project(&[]);
        let code = run(&args(&[tmp.path()]), &global(tmp.path())).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn missing_path_is_an_error() {
        let tmp = project(&[]);
        let missing = tmp.path().join("missing.sv");
        assert!(run(&args(&[&missing]), &global(tmp.path())).is_err());
    }

    #[test]
    fn cli_allow_overrides_file_deny() {
        let file = LintConfig {
            deny: vec!["line-length".to_string()],
            ..LintConfig::default()
        };
        let mut lint_args = args(&[]);
        lint_args.allow = vec!["line-length".to_string()];
        let merged = merge_lint_config(&file, &lint_args);
        assert!(merged.deny.is_empty());
        assert_eq!(merged.allow, ["line-length"]);
    }

    #[test]
    fn cli_deny_overrides_file_allow() {
        let file = LintConfig {
            allow: vec!["W104".to_string()],
            warn: vec!["W104".to_string()],
            ..LintConfig::default()
        };
        let mut lint_args = args(&[]);
        lint_args.deny = vec!["W104".to_string()];
        let merged = merge_lint_config(&file, &lint_args);
        assert_eq!(merged.deny, ["W104"]);
        assert!(merged.allow.is_empty());
        assert!(merged.warn.is_empty());
    }

    #[test]
    fn engine_registers_builtin_rules() {
        let mut config = StyleConfig::default();
        config.style.max_line_length = 10;
        let engine = build_engine(&config, &args(&[]));
        assert_eq!(engine.rule_count(), 17);
    }
}
