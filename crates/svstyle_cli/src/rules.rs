//! `svstyle rules` — lists the built-in rules.

use svstyle_lint::LintEngine;

use crate::GlobalArgs;

/// Runs the `svstyle rules` command.
///
/// Prints one line per rule with the severity the active configuration gives
/// it, or `allowed` when the configuration suppresses it.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = crate::pipeline::load_style_config(global)?;
    let engine = LintEngine::new(&config.lint);
    for line in rule_table(&engine) {
        println!("{line}");
    }
    Ok(0)
}

fn rule_table(engine: &LintEngine) -> Vec<String> {
    let width = engine.rule_names().iter().map(|n| n.len()).max().unwrap_or(0);
    engine
        .rules()
        .map(|rule| {
            let severity = engine
                .severity_for(rule)
                .map_or("allowed", |s| s.as_str());
            format!(
                "{}  {:<width$}  {:<8}  {}",
                rule.code(),
                rule.name(),
                severity,
                rule.description()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use svstyle_config::LintConfig;

    #[test]
    fn lists_every_rule() {
        let table = rule_table(&LintEngine::with_defaults());
        assert_eq!(table.len(), 17);
        assert!(table[0].starts_with("C201  naming-suffix"));
        assert!(table.iter().any(|l| l.starts_with("E102") && l.contains("error")));
    }

    #[test]
    fn shows_configured_severity() {
        let config = LintConfig {
            allow: vec!["line-length".to_string()],
            deny: vec!["W104".to_string()],
            ..LintConfig::default()
        };
        let table = rule_table(&LintEngine::new(&config));
        let line = |code: &str| table.iter().find(|l| l.starts_with(code)).unwrap().clone();
        assert!(line("C206").contains("allowed"));
        assert!(line("W104").contains("error"));
    }
}
