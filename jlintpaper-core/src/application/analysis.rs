//! Per-document analysis context
//!
//! An [`Analysis`] owns every accumulator of one document: the match bucket
//! of each rule and the punctuation counters. A fresh value is created for
//! each file, so nothing carries over between documents.

use super::report::{Excerpt, PunctuationWarning, Report, RuleMatches};
use crate::domain::figure_table::FigureTableWarning;
use crate::domain::paragraph::Paragraph;
use crate::domain::punctuation::PunctuationCounters;
use crate::domain::sentence::Sentence;
use crate::rules::{RuleSet, Scope};
use std::sync::Arc;

#[derive(Debug)]
pub struct Analysis {
    rules: Arc<RuleSet>,
    /// Excerpts of sentence rules, parallel to `rules.rules(Scope::Sentence)`
    sentence_buckets: Vec<Vec<Excerpt>>,
    /// Excerpts of paragraph rules, parallel to `rules.rules(Scope::Paragraph)`
    paragraph_buckets: Vec<Vec<Excerpt>>,
    counters: PunctuationCounters,
    figure_table: Vec<FigureTableWarning>,
}

impl Analysis {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        let sentence_buckets = vec![Vec::new(); rules.rules(Scope::Sentence).len()];
        let paragraph_buckets = vec![Vec::new(); rules.rules(Scope::Paragraph).len()];
        Self {
            rules,
            sentence_buckets,
            paragraph_buckets,
            counters: PunctuationCounters::new(),
            figure_table: Vec::new(),
        }
    }

    /// Counters filled by the preprocessor
    pub fn counters_mut(&mut self) -> &mut PunctuationCounters {
        &mut self.counters
    }

    pub fn counters(&self) -> &PunctuationCounters {
        &self.counters
    }

    /// Run every paragraph rule over `paragraph`
    pub fn evaluate_paragraph(&mut self, paragraph: &Paragraph) {
        let text = paragraph.text();
        for (rule, bucket) in self
            .rules
            .rules(Scope::Paragraph)
            .iter()
            .zip(&mut self.paragraph_buckets)
        {
            for span in rule.matcher.find_all(text) {
                bucket.push(Excerpt {
                    lines: paragraph.lines_of(span.clone()),
                    text: text.to_string(),
                    highlight: span,
                });
            }
        }
    }

    /// Run every sentence rule over `sentence`
    pub fn evaluate_sentence(&mut self, sentence: &Sentence) {
        for (rule, bucket) in self
            .rules
            .rules(Scope::Sentence)
            .iter()
            .zip(&mut self.sentence_buckets)
        {
            for span in rule.matcher.find_all(&sentence.text) {
                bucket.push(Excerpt {
                    lines: sentence.lines,
                    text: sentence.text.clone(),
                    highlight: span,
                });
            }
        }
    }

    pub fn record_figure_table(&mut self, warnings: Vec<FigureTableWarning>) {
        self.figure_table.extend(warnings);
    }

    /// Close the analysis and build its report
    ///
    /// Sentence rules come first, then paragraph rules, each in table order.
    /// Rules without matches are left out.
    pub fn finish(self) -> Report {
        let buckets = self.sentence_buckets.into_iter().chain(self.paragraph_buckets);
        let rules = self
            .rules
            .iter()
            .zip(buckets)
            .filter(|(_, excerpts)| !excerpts.is_empty())
            .map(|(rule, excerpts)| {
                log::trace!("rule '{}' matched {} times", rule.id, excerpts.len());
                RuleMatches {
                    id: rule.id.clone(),
                    description: rule.description.clone(),
                    scope: rule.scope,
                    excerpts,
                }
            })
            .collect();

        Report {
            rules,
            punctuation: PunctuationWarning::from_counters(&self.counters),
            figure_table: self.figure_table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::text::{LineRange, TaggedLine};

    fn rules() -> Arc<RuleSet> {
        Arc::new(
            RuleSet::from_toml(
                r#"
                [[sentence]]
                id = "nanode"
                description = "なので"
                pattern = "なので"

                [[sentence]]
                id = "unused"
                description = "unused"
                pattern = "ZZZ"

                [[paragraph]]
                id = "unclosed"
                description = "unclosed"
                kind = "balanced"
                issue = "unclosed-half-paren"
                "#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_every_match_is_an_excerpt() {
        let mut analysis = Analysis::new(rules());
        analysis.evaluate_sentence(&Sentence::new(
            "速いなので良いなので．",
            LineRange::single(3),
        ));
        let report = analysis.finish();

        assert_eq!(report.rules.len(), 1);
        let matches = &report.rules[0];
        assert_eq!(matches.id, "nanode");
        assert_eq!(matches.scope, Scope::Sentence);
        assert_eq!(matches.excerpts.len(), 2);
        assert!(matches.excerpts.iter().all(|e| e.matched() == "なので"));
    }

    #[test]
    fn test_paragraph_excerpt_uses_match_lines() {
        let mut analysis = Analysis::new(rules());
        let paragraph = Paragraph::new(vec![
            TaggedLine::new(5, "前置き．"),
            TaggedLine::new(6, "(閉じない括弧．"),
        ]);
        analysis.evaluate_paragraph(&paragraph);
        let report = analysis.finish();

        let matches = report.rule("unclosed").unwrap();
        assert_eq!(matches.scope, Scope::Paragraph);
        assert_eq!(matches.excerpts[0].lines, LineRange::single(6));
    }

    #[test]
    fn test_sentence_rules_reported_before_paragraph_rules() {
        let mut analysis = Analysis::new(rules());
        let paragraph = Paragraph::new(vec![TaggedLine::new(1, "(なので．")]);
        analysis.evaluate_paragraph(&paragraph);
        for sentence in paragraph.sentences() {
            analysis.evaluate_sentence(sentence);
        }
        let ids: Vec<String> = analysis.finish().rules.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["nanode", "unclosed"]);
    }

    #[test]
    fn test_fresh_analysis_starts_empty() {
        let rules = rules();
        let mut first = Analysis::new(Arc::clone(&rules));
        first.evaluate_sentence(&Sentence::new("なので．", LineRange::single(1)));
        assert_eq!(first.finish().match_count(), 1);

        let second = Analysis::new(rules);
        assert!(second.finish().is_clean());
    }
}
