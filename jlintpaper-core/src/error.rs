//! Error types for checking and rule-table configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the analysis of a single document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The analyzable region could not be located
    #[error("\\begin{{document}} not found")]
    MissingDocumentStart,
}

/// Errors raised while loading or compiling a rule table
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rule file could not be read
    #[error("Failed to read rule file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The rule file is not valid TOML or does not match the schema
    #[error("Failed to parse rule table: {0}")]
    Parse(#[from] toml::de::Error),

    /// A rule pattern or guard failed to compile
    #[error("rule '{rule_id}' has invalid regex '{pattern}': {source}")]
    InvalidRegex {
        rule_id: String,
        pattern: String,
        source: regex::Error,
    },

    /// A field required by the rule's kind is absent
    #[error("rule '{rule_id}' requires field '{field}'")]
    MissingField {
        rule_id: String,
        field: &'static str,
    },

    /// The `issue` of a balanced rule is not a known issue class
    #[error("rule '{rule_id}' has unknown issue class '{issue}'")]
    UnknownIssue { rule_id: String, issue: String },

    /// A `repeat` pattern has no capture group to compare
    #[error("rule '{rule_id}' pattern must contain a capture group")]
    MissingCapture { rule_id: String },

    /// Two rules share the same id
    #[error("duplicate rule id '{0}'")]
    DuplicateId(String),
}
