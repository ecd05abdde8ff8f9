//! Rule tables
//!
//! Rules are data: a TOML table of `[[sentence]]` and `[[paragraph]]`
//! entries compiled once into [`RuleSet`]. The built-in table is embedded
//! from `configs/rules/default.toml`.

pub mod config;
pub mod matcher;

pub use config::{MatcherKind, MetadataConfig, RuleConfig, RuleSetConfig};
pub use matcher::{Guards, Matcher};

use crate::domain::enclosure::IssueClass;
use crate::error::ConfigError;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

const DEFAULT_RULES: &str = include_str!("../../configs/rules/default.toml");

static BUILTIN: LazyLock<Arc<RuleSet>> = LazyLock::new(|| {
    Arc::new(RuleSet::from_toml(DEFAULT_RULES).expect("built-in rule table must compile"))
});

/// Unit of text a rule is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Paragraph,
    Sentence,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Paragraph => f.pad("paragraph"),
            Scope::Sentence => f.pad("sentence"),
        }
    }
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub description: String,
    pub scope: Scope,
    pub matcher: Matcher,
}

impl Rule {
    fn compile(config: &RuleConfig, scope: Scope) -> Result<Self, ConfigError> {
        let matcher = match config.kind {
            MatcherKind::Pattern => Matcher::Pattern {
                regex: compile(&config.id, required(config, "pattern", &config.pattern)?)?,
                guards: compile_guards(config)?,
            },
            MatcherKind::Math => Matcher::Math {
                regex: compile(&config.id, required(config, "pattern", &config.pattern)?)?,
                guards: compile_guards(config)?,
            },
            MatcherKind::Repeat => {
                let regex = compile(&config.id, required(config, "pattern", &config.pattern)?)?;
                if regex.captures_len() < 2 {
                    return Err(ConfigError::MissingCapture {
                        rule_id: config.id.clone(),
                    });
                }
                let gap = config.gap.as_deref().unwrap_or(".*");
                Matcher::Repeat {
                    regex,
                    gap: compile(&config.id, &format!("^(?:{gap})$"))?,
                }
            }
            MatcherKind::Balanced => {
                let issue = required(config, "issue", &config.issue)?;
                let class = issue
                    .parse::<IssueClass>()
                    .map_err(|issue| ConfigError::UnknownIssue {
                        rule_id: config.id.clone(),
                        issue,
                    })?;
                Matcher::Balanced(class)
            }
        };

        Ok(Self {
            id: config.id.clone(),
            description: config.description.clone(),
            scope,
            matcher,
        })
    }
}

fn required<'a>(
    config: &RuleConfig,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or_else(|| ConfigError::MissingField {
        rule_id: config.id.clone(),
        field,
    })
}

fn compile(rule_id: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_guards(config: &RuleConfig) -> Result<Guards, ConfigError> {
    let behind = |p: &Option<String>| {
        p.as_deref()
            .map(|p| compile(&config.id, &Guards::behind(p)))
            .transpose()
    };
    let ahead = |p: &Option<String>| {
        p.as_deref()
            .map(|p| compile(&config.id, &Guards::ahead(p)))
            .transpose()
    };

    Ok(Guards {
        preceded_by: behind(&config.preceded_by)?,
        not_preceded_by: behind(&config.not_preceded_by)?,
        followed_by: ahead(&config.followed_by)?,
        not_followed_by: ahead(&config.not_followed_by)?,
    })
}

/// Ordered, immutable rule tables for both scopes
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    sentence: Vec<Rule>,
    paragraph: Vec<Rule>,
}

impl RuleSet {
    /// The embedded default table, compiled on first use
    pub fn builtin() -> Arc<RuleSet> {
        Arc::clone(&BUILTIN)
    }

    /// Parse and compile a rule table from TOML source
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: RuleSetConfig = toml::from_str(source)?;
        Self::from_config(&config)
    }

    /// Load a rule table from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    pub fn from_config(config: &RuleSetConfig) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for rule in config.sentence.iter().chain(&config.paragraph) {
            if !seen.insert(rule.id.as_str()) {
                return Err(ConfigError::DuplicateId(rule.id.clone()));
            }
        }

        let sentence = config
            .sentence
            .iter()
            .map(|c| Rule::compile(c, Scope::Sentence))
            .collect::<Result<Vec<_>, _>>()?;
        let paragraph = config
            .paragraph
            .iter()
            .map(|c| Rule::compile(c, Scope::Paragraph))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "compiled rule table '{}': {} sentence rules, {} paragraph rules",
            config.metadata.name,
            sentence.len(),
            paragraph.len()
        );

        Ok(Self {
            name: config.metadata.name.clone(),
            sentence,
            paragraph,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules of one scope, in table order
    pub fn rules(&self, scope: Scope) -> &[Rule] {
        match scope {
            Scope::Sentence => &self.sentence,
            Scope::Paragraph => &self.paragraph,
        }
    }

    /// Every rule in report order: sentence rules, then paragraph rules
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.sentence.iter().chain(&self.paragraph)
    }

    pub fn len(&self) -> usize {
        self.sentence.len() + self.paragraph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.iter().find(|rule| rule.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_match(id: &str, text: &str) -> bool {
        RuleSet::builtin()
            .get(id)
            .unwrap_or_else(|| panic!("no rule {id}"))
            .matcher
            .is_match(text)
    }

    #[test]
    fn test_builtin_table_compiles() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.name(), "default");
        assert!(rules.rules(Scope::Sentence).len() > 40);
        assert_eq!(rules.rules(Scope::Paragraph).len(), 11);
        assert!(rules
            .rules(Scope::Paragraph)
            .iter()
            .all(|r| r.scope == Scope::Paragraph));
    }

    #[test]
    fn test_iter_orders_sentence_rules_first() {
        let rules = RuleSet::builtin();
        let scopes: Vec<Scope> = rules.iter().map(|r| r.scope).collect();
        let first_paragraph = scopes.iter().position(|s| *s == Scope::Paragraph).unwrap();
        assert!(scopes[first_paragraph..].iter().all(|s| *s == Scope::Paragraph));
    }

    #[test]
    fn test_builtin_rules_on_typical_sentences() {
        assert!(builtin_match("colloquial-because", "この手法は速いなので有用である．"));
        assert!(builtin_match("zenkaku-digit", "値は１である．"));
        assert!(builtin_match("desu-masu", "これはペンです．"));
        assert!(!builtin_match("desu-masu", "これはペンである．"));
        assert!(builtin_match("missing-terminal", "結論を述べる"));
        assert!(!builtin_match("missing-terminal", "結論を述べる．"));
        assert!(!builtin_match("missing-terminal", "\\end{itemize}"));
        assert!(builtin_match("ref-context", "\\ref{fig:a}に示す．"));
        assert!(!builtin_match("ref-context", "図\\ref{fig:a}に示す．"));
        assert!(!builtin_match("ref-context", "\\ref{sec:a}節で述べる．"));
    }

    #[test]
    fn test_builtin_digit_rules_only_see_ascii_digits() {
        assert!(builtin_match("digit-grouping", "値は12345である．"));
        assert!(!builtin_match("digit-grouping", "値は１２３４５である．"));
        assert!(!builtin_match("digit-grouping", "2023年である．"));
        assert!(builtin_match("hardcoded-number", "図3に示す．"));
        assert!(!builtin_match("hardcoded-number", "図３に示す．"));
        assert!(builtin_match("comma-space", "a,b"));
        assert!(!builtin_match("comma-space", "1,000"));
    }

    #[test]
    fn test_builtin_kana_preferred_guards() {
        assert!(builtin_match("kana-preferred", "その事は重要である．"));
        assert!(!builtin_match("kana-preferred", "事実である．"));
        assert!(!builtin_match("kana-preferred", "翻訳する．"));
    }

    #[test]
    fn test_builtin_math_rule() {
        assert!(builtin_match("math-multi-letter", "関数$log x$を用いる．"));
        assert!(!builtin_match("math-multi-letter", "関数$\\log x$を用いる．"));
        assert!(!builtin_match("math-multi-letter", "$x$ and $y$"));
    }

    #[test]
    fn test_builtin_repeat_rule() {
        assert!(builtin_match("repeated-suru-verb", "検索するために検索を行う．"));
        assert!(!builtin_match("repeated-suru-verb", "検索するために、検索を行う．"));
    }

    #[test]
    fn test_from_toml_custom_table() {
        let rules = RuleSet::from_toml(
            r#"
            [metadata]
            name = "mine"

            [[sentence]]
            id = "no-soshite"
            description = "そして"
            pattern = "そして"
            "#,
        )
        .unwrap();
        assert_eq!(rules.name(), "mine");
        assert_eq!(rules.len(), 1);
        assert!(rules.get("no-soshite").unwrap().matcher.is_match("そして終わる．"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = RuleSet::from_toml(
            r#"
            [[sentence]]
            id = "x"
            description = "a"
            pattern = "a"

            [[paragraph]]
            id = "x"
            description = "b"
            kind = "balanced"
            issue = "mixed-paren"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateId(id) if id == "x"));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = RuleSet::from_toml(
            r#"
            [[sentence]]
            id = "broken"
            description = "b"
            pattern = "a"
            followed_by = "("
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { rule_id, .. } if rule_id == "broken"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = RuleSet::from_toml(
            r#"
            [[sentence]]
            id = "nopattern"
            description = "n"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "pattern", .. }));

        let err = RuleSet::from_toml(
            r#"
            [[paragraph]]
            id = "noissue"
            description = "n"
            kind = "balanced"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "issue", .. }));
    }

    #[test]
    fn test_unknown_issue_and_missing_capture() {
        let err = RuleSet::from_toml(
            r#"
            [[paragraph]]
            id = "brace"
            description = "b"
            kind = "balanced"
            issue = "unclosed-brace"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownIssue { issue, .. } if issue == "unclosed-brace"));

        let err = RuleSet::from_toml(
            r#"
            [[sentence]]
            id = "nocap"
            description = "n"
            kind = "repeat"
            pattern = "する"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCapture { .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let err = RuleSet::from_file("/nonexistent/rules.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_file_reads_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            "[[sentence]]\nid = \"a\"\ndescription = \"a\"\npattern = \"a\"\n",
        )
        .unwrap();
        assert_eq!(RuleSet::from_file(&path).unwrap().len(), 1);
    }
}
