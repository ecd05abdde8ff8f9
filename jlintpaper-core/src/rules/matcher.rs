//! Match strategies behind rules
//!
//! The `regex` crate has neither lookaround nor back-references, so those
//! are expressed here: lookaround as [`Guards`] tested against the text on
//! either side of a candidate, back-references as [`Matcher::Repeat`], and
//! recursive bracket patterns as [`Matcher::Balanced`].

use crate::domain::enclosure::{scan_enclosures, IssueClass};
use regex::Regex;
use std::ops::Range;

/// Lookaround conditions around a candidate match
#[derive(Debug, Clone, Default)]
pub struct Guards {
    /// Must match at the end of the text before the candidate
    pub preceded_by: Option<Regex>,
    /// Must not match at the end of the text before the candidate
    pub not_preceded_by: Option<Regex>,
    /// Must match at the start of the text after the candidate
    pub followed_by: Option<Regex>,
    /// Must not match at the start of the text after the candidate
    pub not_followed_by: Option<Regex>,
}

impl Guards {
    /// Source for a lookbehind guard: anchored at the end of the prefix
    pub fn behind(pattern: &str) -> String {
        format!("(?:{pattern})$")
    }

    /// Source for a lookahead guard: anchored at the start of the suffix
    pub fn ahead(pattern: &str) -> String {
        format!("^(?:{pattern})")
    }

    pub fn is_empty(&self) -> bool {
        self.preceded_by.is_none()
            && self.not_preceded_by.is_none()
            && self.followed_by.is_none()
            && self.not_followed_by.is_none()
    }

    /// Whether the candidate `span` of `text` passes every guard
    pub fn accept(&self, text: &str, span: &Range<usize>) -> bool {
        let before = &text[..span.start];
        let after = &text[span.end..];
        self.preceded_by.as_ref().map_or(true, |r| r.is_match(before))
            && !self.not_preceded_by.as_ref().is_some_and(|r| r.is_match(before))
            && self.followed_by.as_ref().map_or(true, |r| r.is_match(after))
            && !self.not_followed_by.as_ref().is_some_and(|r| r.is_match(after))
    }
}

/// Compiled matching strategy of one rule
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Every guarded match of a regex
    Pattern { regex: Regex, guards: Guards },
    /// Inline math spans whose content contains a guarded match
    Math { regex: Regex, guards: Guards },
    /// A match whose first capture reappears after text matching `gap`
    ///
    /// `gap` is anchored at both ends.
    Repeat { regex: Regex, gap: Regex },
    /// Bracket/quote pairing problems of one class
    Balanced(IssueClass),
}

impl Matcher {
    /// Byte spans of every match in `text`, in order
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        match self {
            Matcher::Pattern { regex, guards } => find_guarded(regex, guards, text, 0, text.len()),
            Matcher::Math { regex, guards } => find_math(regex, guards, text),
            Matcher::Repeat { regex, gap } => find_repeat(regex, gap, text),
            Matcher::Balanced(class) => scan_enclosures(text)
                .into_iter()
                .filter(|issue| issue.class == *class)
                .map(|issue| issue.span)
                .collect(),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        !self.find_all(text).is_empty()
    }
}

/// Offset of the character after the one starting at `pos`
fn next_char(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| pos + c.len_utf8())
}

/// Guarded matches starting in `from..limit`, searched within `text[..limit]`
///
/// A candidate rejected by a guard is retried one character later, which is
/// how a lookaround failure behaves in a backtracking engine.
fn find_guarded(
    regex: &Regex,
    guards: &Guards,
    text: &str,
    from: usize,
    limit: usize,
) -> Vec<Range<usize>> {
    let haystack = &text[..limit];
    let mut found = Vec::new();
    let mut pos = from;

    while pos <= haystack.len() {
        let Some(m) = regex.find_at(haystack, pos) else {
            break;
        };
        let span = m.range();
        if guards.accept(text, &span) {
            pos = if span.is_empty() {
                next_char(haystack, span.end)
            } else {
                span.end
            };
            found.push(span);
        } else {
            pos = next_char(haystack, span.start);
        }
    }

    found
}

/// Offset of the next `$` at or after `from` that is not escaped
fn next_dollar(text: &str, from: usize) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in text[from..].char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '$' => return Some(from + i),
            _ => {}
        }
    }
    None
}

/// Whole `$..$` spans containing a guarded match
///
/// Each search resumes at the end of the previous span, so a match can only
/// come from inside the math span being examined.
fn find_math(regex: &Regex, guards: &Guards, text: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(open) = next_dollar(text, pos) {
        let Some(close) = next_dollar(text, open + 1) else {
            break;
        };
        if !find_guarded(regex, guards, text, open + 1, close).is_empty() {
            found.push(open..close + 1);
        }
        pos = close + 1;
    }

    found
}

fn find_repeat(regex: &Regex, gap: &Regex, text: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(caps) = regex.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let repeated = caps.get(1).map_or("", |c| c.as_str());

        // the last repetition reachable across the gap wins, as with a greedy gap
        let end = if repeated.is_empty() {
            None
        } else {
            text[whole.end()..]
                .match_indices(repeated)
                .map(|(i, _)| whole.end() + i)
                .filter(|&at| gap.is_match(&text[whole.end()..at]))
                .last()
                .map(|at| at + repeated.len())
        };

        match end {
            Some(end) => {
                found.push(whole.start()..end);
                pos = end;
            }
            None => pos = next_char(text, whole.start()),
        }
        if pos > text.len() {
            break;
        }
    }

    found
}
