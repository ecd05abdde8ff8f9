//! Serialized form of rule tables

use serde::{Deserialize, Serialize};

/// A complete rule table as written in TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Rules evaluated on every sentence, in report order
    #[serde(default)]
    pub sentence: Vec<RuleConfig>,
    /// Rules evaluated on every paragraph, in report order
    #[serde(default)]
    pub paragraph: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// How a rule finds its matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherKind {
    /// Regex with optional lookaround guards
    #[default]
    Pattern,
    /// Regex tested inside each inline math span
    Math,
    /// Capture group that must reappear after a gap
    Repeat,
    /// Bracket/quote pairing problem
    Balanced,
}

/// One rule entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub kind: MatcherKind,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub preceded_by: Option<String>,
    #[serde(default)]
    pub not_preceded_by: Option<String>,
    #[serde(default)]
    pub followed_by: Option<String>,
    #[serde(default)]
    pub not_followed_by: Option<String>,
    /// Allowed text between a `repeat` match and its repetition
    #[serde(default)]
    pub gap: Option<String>,
    /// Issue class reported by a `balanced` rule
    #[serde(default)]
    pub issue: Option<String>,
}
