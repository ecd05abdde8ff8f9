//! Report model produced by one analysis

use crate::domain::figure_table::FigureTableWarning;
use crate::domain::punctuation::{PunctuationCounters, PunctuationStyle};
use crate::domain::text::LineRange;
use crate::rules::Scope;
use serde::Serialize;
use std::ops::Range;

/// Marker pair used when none is given: plain-text delimiters
pub const PLAIN_MARKERS: (&str, &str) = (">>>", "<<<");

/// A matched unit with the offending span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    /// Source lines of the match
    pub lines: LineRange,
    /// Text of the unit the rule was evaluated on
    pub text: String,
    /// Byte span of the match within `text`
    pub highlight: Range<usize>,
}

impl Excerpt {
    /// The excerpt text with the match wrapped in `open`/`close`
    ///
    /// Line breaks are folded into spaces so the excerpt stays on one line.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + open.len() + close.len());
        out.push_str(&self.text[..self.highlight.start]);
        out.push_str(open);
        out.push_str(&self.text[self.highlight.clone()]);
        out.push_str(close);
        out.push_str(&self.text[self.highlight.end..]);
        out.replace('\n', " ")
    }

    /// The matched text alone
    pub fn matched(&self) -> &str {
        &self.text[self.highlight.clone()]
    }
}

/// All excerpts recorded for one rule, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatches {
    pub id: String,
    pub description: String,
    pub scope: Scope,
    pub excerpts: Vec<Excerpt>,
}

/// A line using the minority punctuation style
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffendingLine {
    pub line: usize,
    pub text: String,
}

/// Both punctuation styles occur in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PunctuationWarning {
    pub dominant: PunctuationStyle,
    pub minority: PunctuationStyle,
    /// Lines containing `．` or `，`
    pub full_width_lines: usize,
    /// Lines containing `。` or `、`
    pub native_lines: usize,
    /// Every line of the minority style, in source order
    pub offending: Vec<OffendingLine>,
}

impl PunctuationWarning {
    /// Build the warning when the counters show mixed usage
    pub fn from_counters(counters: &PunctuationCounters) -> Option<Self> {
        if !counters.is_mixed() {
            return None;
        }
        let dominant = counters.dominant();
        let minority = match dominant {
            PunctuationStyle::FullWidth => PunctuationStyle::Native,
            PunctuationStyle::Native => PunctuationStyle::FullWidth,
        };
        let offending = counters
            .usage(minority)
            .lines
            .iter()
            .map(|(line, text)| OffendingLine {
                line: *line,
                text: text.clone(),
            })
            .collect();

        Some(Self {
            dominant,
            minority,
            full_width_lines: counters.full_width.count,
            native_lines: counters.native.count,
            offending,
        })
    }
}

/// Everything found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Rules with at least one match, in table order
    pub rules: Vec<RuleMatches>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuation: Option<PunctuationWarning>,
    pub figure_table: Vec<FigureTableWarning>,
}

impl Report {
    /// Whether nothing at all was flagged
    pub fn is_clean(&self) -> bool {
        self.rules.is_empty() && self.punctuation.is_none() && self.figure_table.is_empty()
    }

    /// Number of rule excerpts across all rules
    pub fn match_count(&self) -> usize {
        self.rules.iter().map(|r| r.excerpts.len()).sum()
    }

    /// Matches of one rule, if it fired
    pub fn rule(&self, id: &str) -> Option<&RuleMatches> {
        self.rules.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::text::TaggedLine;

    #[test]
    fn test_excerpt_render() {
        let excerpt = Excerpt {
            lines: LineRange::single(4),
            text: "これはペンです．".to_string(),
            highlight: 15..24,
        };
        assert_eq!(excerpt.matched(), "です．");
        assert_eq!(excerpt.render(">>>", "<<<"), "これはペン>>>です．<<<");
    }

    #[test]
    fn test_excerpt_render_folds_newlines() {
        let excerpt = Excerpt {
            lines: LineRange::new(1, 2),
            text: "a\nb".to_string(),
            highlight: 0..1,
        };
        assert_eq!(excerpt.render("[", "]"), "[a] b");
    }

    #[test]
    fn test_punctuation_warning_lists_minority() {
        let mut counters = PunctuationCounters::new();
        for (n, text) in [(1, "一，"), (2, "二．"), (3, "三．"), (4, "四。")] {
            counters.observe(&TaggedLine::new(n, text));
        }
        let warning = PunctuationWarning::from_counters(&counters).unwrap();
        assert_eq!(warning.dominant, PunctuationStyle::FullWidth);
        assert_eq!(warning.minority, PunctuationStyle::Native);
        assert_eq!(warning.full_width_lines, 3);
        assert_eq!(warning.native_lines, 1);
        assert_eq!(
            warning.offending,
            vec![OffendingLine {
                line: 4,
                text: "四。".to_string()
            }]
        );
    }

    #[test]
    fn test_no_punctuation_warning_for_single_style() {
        let mut counters = PunctuationCounters::new();
        counters.observe(&TaggedLine::new(1, "一。"));
        assert!(PunctuationWarning::from_counters(&counters).is_none());
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = Report::default();
        assert!(report.is_clean());
        assert_eq!(report.match_count(), 0);
    }
}
