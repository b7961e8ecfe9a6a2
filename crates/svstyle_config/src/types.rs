//! Configuration types deserialized from `svstyle.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level configuration parsed from `svstyle.toml`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Rule enablement and severity overrides.
    #[serde(default)]
    pub lint: LintConfig,
    /// Tunable thresholds consumed by individual rules.
    #[serde(default)]
    pub style: StyleOptions,
    /// Source discovery settings.
    #[serde(default)]
    pub files: FilesConfig,
}

/// Lint configuration controlling which rules are enabled and how severe they are.
///
/// Each entry is a rule name (`naming-suffix`) or a code (`C201`).
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Rules whose diagnostics are promoted to errors.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub deny: Vec<String>,
    /// Rules that are not run at all.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub allow: Vec<String>,
    /// Rules whose diagnostics are demoted to warnings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub warn: Vec<String>,
}

impl LintConfig {
    /// Adds `rules` to the allow list, removing them from `deny` and `warn`.
    pub fn allow_rules<S: AsRef<str>>(&mut self, rules: &[S]) {
        for rule in rules.iter().map(AsRef::as_ref) {
            self.deny.retain(|r| r != rule);
            self.warn.retain(|r| r != rule);
            if !self.allow.iter().any(|r| r == rule) {
                self.allow.push(rule.to_string());
            }
        }
    }

    /// Adds `rules` to the deny list, removing them from `allow` and `warn`.
    pub fn deny_rules<S: AsRef<str>>(&mut self, rules: &[S]) {
        for rule in rules.iter().map(AsRef::as_ref) {
            self.allow.retain(|r| r != rule);
            self.warn.retain(|r| r != rule);
            if !self.deny.iter().any(|r| r == rule) {
                self.deny.push(rule.to_string());
            }
        }
    }
}

/// Thresholds read by the formatting rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleOptions {
    /// Maximum line length in characters.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Report `always_ff` resets that are tested in the body but missing
    /// from the event list, requiring every reset to be asynchronous.
    #[serde(default)]
    pub require_async_reset: bool,
}

fn default_max_line_length() -> usize {
    100
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            require_async_reset: false,
        }
    }
}

/// Settings for discovering source files under directory arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// File extensions (without the dot) treated as (System)Verilog source.
    #[serde(default = "default_extensions", deserialize_with = "deserialize_string_or_vec")]
    pub extensions: Vec<String>,
    /// Path components that are skipped during directory walks.
    #[serde(default = "default_exclude", deserialize_with = "deserialize_string_or_vec")]
    pub exclude: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    ["sv", "svh", "v", "vh"].map(String::from).to_vec()
}

fn default_exclude() -> Vec<String> {
    Vec::new()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
        }
    }
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Lets `allow = "line-length"` stand in for `allow = ["line-length"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
