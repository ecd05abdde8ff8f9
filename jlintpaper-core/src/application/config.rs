//! Options for checking documents

use crate::error::ConfigError;
use crate::rules::RuleSet;
use std::path::Path;
use std::sync::Arc;

/// Configuration of a [`Checker`](super::Checker)
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Rule table applied to every document
    pub rules: Arc<RuleSet>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            rules: RuleSet::builtin(),
        }
    }
}

impl CheckOptions {
    /// Creates a new builder for CheckOptions
    pub fn builder() -> CheckOptionsBuilder {
        CheckOptionsBuilder::new()
    }
}

/// Builder for CheckOptions with fluent API
#[derive(Debug, Clone, Default)]
pub struct CheckOptionsBuilder {
    options: CheckOptions,
}

impl CheckOptionsBuilder {
    /// Creates a new builder using the built-in rule table
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already compiled rule table
    pub fn rules(mut self, rules: Arc<RuleSet>) -> Self {
        self.options.rules = rules;
        self
    }

    /// Load the rule table from a TOML file
    pub fn rules_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let rules = RuleSet::from_file(path)?;
        Ok(self.rules(Arc::new(rules)))
    }

    pub fn build(self) -> CheckOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_builtin_rules() {
        let options = CheckOptions::default();
        assert!(Arc::ptr_eq(&options.rules, &RuleSet::builtin()));
    }

    #[test]
    fn test_builder_with_custom_rules() {
        let rules = Arc::new(
            RuleSet::from_toml("[[sentence]]\nid = \"a\"\ndescription = \"a\"\npattern = \"a\"\n")
                .unwrap(),
        );
        let options = CheckOptions::builder().rules(Arc::clone(&rules)).build();
        assert_eq!(options.rules.len(), 1);
    }

    #[test]
    fn test_builder_rules_file_error() {
        let result = CheckOptions::builder().rules_file("/nonexistent/rules.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
