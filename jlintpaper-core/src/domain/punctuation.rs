//! Full-width vs. native punctuation usage counters

use super::text::TaggedLine;
use serde::Serialize;

/// Punctuation style of a manuscript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationStyle {
    /// Full-width period and comma: ．，
    FullWidth,
    /// Native Japanese marks: 。、
    Native,
}

impl PunctuationStyle {
    /// The two characters that identify the style
    pub fn marks(&self) -> &'static str {
        match self {
            PunctuationStyle::FullWidth => "．，",
            PunctuationStyle::Native => "。、",
        }
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            PunctuationStyle::FullWidth => text.contains(['．', '，']),
            PunctuationStyle::Native => text.contains(['。', '、']),
        }
    }
}

/// Lines using one punctuation style
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleUsage {
    /// Number of lines using the style
    pub count: usize,
    /// `(line number, line text)` of every such line, in source order
    pub lines: Vec<(usize, String)>,
}

impl StyleUsage {
    fn record(&mut self, line: &TaggedLine) {
        self.count += 1;
        self.lines.push((line.number, line.text.clone()));
    }
}

/// Per-file punctuation counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PunctuationCounters {
    pub full_width: StyleUsage,
    pub native: StyleUsage,
}

impl PunctuationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one line; a line may count for both styles
    pub fn observe(&mut self, line: &TaggedLine) {
        if PunctuationStyle::FullWidth.matches(&line.text) {
            self.full_width.record(line);
        }
        if PunctuationStyle::Native.matches(&line.text) {
            self.native.record(line);
        }
    }

    /// Whether both styles occur in the document
    pub fn is_mixed(&self) -> bool {
        self.full_width.count > 0 && self.native.count > 0
    }

    /// The style used on more lines; full-width wins a tie
    pub fn dominant(&self) -> PunctuationStyle {
        if self.full_width.count >= self.native.count {
            PunctuationStyle::FullWidth
        } else {
            PunctuationStyle::Native
        }
    }

    pub fn usage(&self, style: PunctuationStyle) -> &StyleUsage {
        match style {
            PunctuationStyle::FullWidth => &self.full_width,
            PunctuationStyle::Native => &self.native,
        }
    }
}
