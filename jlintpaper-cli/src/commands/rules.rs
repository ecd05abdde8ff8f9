//! Rule table commands

use crate::error::CliError;
use anyhow::Result;
use clap::{Args, Subcommand};
use jlintpaper_core::{RuleSet, Scope};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rules subcommands
#[derive(Debug, Subcommand)]
pub enum RulesCommands {
    /// List the rules of a table
    List(ListArgs),

    /// Validate a rule table file
    Validate(ValidateArgs),
}

impl RulesCommands {
    pub fn execute(&self) -> Result<()> {
        match self {
            RulesCommands::List(args) => args.execute(),
            RulesCommands::Validate(args) => args.execute(),
        }
    }
}

/// Arguments for `rules list`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Rule table to list (default: built-in)
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self) -> Result<()> {
        let rules = match &self.rules {
            Some(path) => Arc::new(load(path)?),
            None => RuleSet::builtin(),
        };
        let stdout = io::stdout();
        write_rules(&mut stdout.lock(), &rules)?;
        Ok(())
    }
}

fn write_rules(writer: &mut dyn Write, rules: &RuleSet) -> Result<()> {
    writeln!(writer, "Rule table: {}", rules.name())?;
    for rule in rules.iter() {
        writeln!(
            writer,
            "  {:<28} {:<9} {}",
            rule.id, rule.scope, rule.description
        )?;
    }
    Ok(())
}

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the rule table to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub rules: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating rule table: {}", self.rules.display());

        match RuleSet::from_file(&self.rules) {
            Ok(rules) => {
                println!("✓ Rule table is valid!");
                println!("  Name: {}", rules.name());
                println!(
                    "  Sentence rules: {}",
                    rules.rules(Scope::Sentence).len()
                );
                println!(
                    "  Paragraph rules: {}",
                    rules.rules(Scope::Paragraph).len()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Rule table is invalid!");
                println!("  Error: {e}");
                Err(CliError::RuleTable {
                    path: self.rules.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }
}

fn load(path: &Path) -> Result<RuleSet> {
    RuleSet::from_file(path).map_err(|e| {
        CliError::RuleTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const TABLE: &str = r#"
[metadata]
name = "house-style"

[[sentence]]
id = "no-soshite"
description = "「そして」は使わない"
pattern = "そして"

[[paragraph]]
id = "unclosed"
description = "閉じていない括弧"
kind = "balanced"
issue = "unclosed-half-paren"
"#;

    #[test]
    fn test_validate_valid_table() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{TABLE}").unwrap();

        let args = ValidateArgs {
            rules: temp_file.path().to_path_buf(),
        };
        assert!(args.execute().is_ok());
    }

    #[test]
    fn test_validate_invalid_regex() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "[[sentence]]\nid = \"bad\"\ndescription = \"bad\"\npattern = \"(\"\n"
        )
        .unwrap();

        let args = ValidateArgs {
            rules: temp_file.path().to_path_buf(),
        };
        let err = args.execute().unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_write_rules() {
        let rules = RuleSet::from_toml(TABLE).unwrap();
        let mut buf = Vec::new();
        write_rules(&mut buf, &rules).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with("Rule table: house-style\n"));
        let lines: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("no-soshite") && lines[0].contains("sentence"));
        assert!(lines[1].contains("unclosed") && lines[1].contains("paragraph"));
    }

    #[test]
    fn test_list_missing_file() {
        let args = ListArgs {
            rules: Some(PathBuf::from("/nonexistent/rules.toml")),
        };
        assert!(args.execute().is_err());
    }
}
