//! All built-in rule implementations.
//!
//! This module re-exports the individual rule types and provides
//! `register_builtin_rules` to add all 17 rules to a `LintEngine`.

mod c201;
mod c202;
mod c203;
mod c204;
mod c205;
mod c206;
mod c207;
mod c208;
mod c209;
mod e102;
mod e103;
mod w101;
mod w102;
mod w103;
mod w104;
mod w105;
mod w106;

pub use c201::NamingSuffix;
pub use c202::ActiveLowSuffix;
pub use c203::DeclarationAlignment;
pub use c204::BlockDelimiter;
pub use c205::DqNaming;
pub use c206::LineLength;
pub use c207::TabCharacter;
pub use c208::TrailingWhitespace;
pub use c209::ParameterCase;
pub use e102::AssignmentKind;
pub use e103::CombDefault;
pub use w101::LogicalOperator;
pub use w102::ImplicitTruncation;
pub use w103::DanglingStatement;
pub use w104::CaseCompleteness;
pub use w105::SensitivityList;
pub use w106::LegacyAlways;

use crate::{LintEngine, LintRule};

/// Returns a fresh instance of every built-in rule, conventions first.
pub fn builtin_rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(NamingSuffix),
        Box::new(ActiveLowSuffix),
        Box::new(DeclarationAlignment),
        Box::new(BlockDelimiter),
        Box::new(DqNaming),
        Box::new(LineLength),
        Box::new(TabCharacter),
        Box::new(TrailingWhitespace),
        Box::new(ParameterCase),
        Box::new(LogicalOperator),
        Box::new(ImplicitTruncation),
        Box::new(DanglingStatement),
        Box::new(CaseCompleteness),
        Box::new(SensitivityList),
        Box::new(LegacyAlways),
        Box::new(AssignmentKind),
        Box::new(CombDefault),
    ]
}

/// Registers all 17 built-in rules with the engine.
///
/// This adds rules C201-C209, W101-W106, and E102/E103.
pub fn register_builtin_rules(engine: &mut LintEngine) {
    for rule in builtin_rules() {
        engine.register(rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_and_names_are_unique() {
        let rules = builtin_rules();
        let codes: HashSet<_> = rules.iter().map(|r| r.code()).collect();
        let names: HashSet<_> = rules.iter().map(|r| r.name().to_string()).collect();
        assert_eq!(codes.len(), rules.len());
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn names_are_kebab_case() {
        for rule in builtin_rules() {
            assert!(
                rule.name()
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c == '-'),
                "{}",
                rule.name()
            );
        }
    }
}
