//! Line-addressable text
//!
//! Every transformation in the pipeline works on [`TaggedText`], a list of
//! lines that each remember the 1-based line number they came from in the
//! source file. Multi-line edits go through the joined view
//! ([`TaggedText::joined`]) and [`TaggedText::remove_ranges`], which map byte
//! offsets back onto the original lines.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

// ============================================================================
// Line references
// ============================================================================

/// Inclusive range of source lines a unit was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineRange {
    /// First source line (1-based)
    pub start: usize,
    /// Last source line (1-based, `>= start`)
    pub end: usize,
}

impl LineRange {
    /// Range covering a single line
    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// Range covering `start..=end`, normalizing reversed bounds
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Whether the range covers exactly one line
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

// ============================================================================
// Tagged lines
// ============================================================================

/// A line of text tagged with its original line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    /// 1-based line number in the source file
    pub number: usize,
    /// Current content, without the trailing newline
    pub text: String,
    /// Set when an edit turned a non-blank line blank
    emptied: bool,
}

impl TaggedLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            emptied: false,
        }
    }

    /// Whether the line holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether the line became blank because of an edit
    pub fn was_emptied(&self) -> bool {
        self.emptied
    }

    /// Replace the content, remembering if the edit blanked the line
    pub fn set_text(&mut self, text: String) {
        if !self.is_blank() && text.trim().is_empty() {
            self.emptied = true;
        }
        self.text = text;
    }
}

/// Maps byte offsets of a joined buffer back to source lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// `(offset of line start, source line number)`, sorted by offset
    starts: Vec<(usize, usize)>,
}

impl LineIndex {
    /// Record that the line `number` starts at byte `offset`
    ///
    /// Offsets must be pushed in ascending order.
    pub fn push(&mut self, offset: usize, number: usize) {
        self.starts.push((offset, number));
    }

    /// Source line containing the byte at `offset`
    pub fn line_at(&self, offset: usize) -> usize {
        let idx = self.starts.partition_point(|&(start, _)| start <= offset);
        self.starts
            .get(idx.saturating_sub(1))
            .map(|&(_, line)| line)
            .unwrap_or(0)
    }

    /// Source lines spanned by a byte range of the joined buffer
    pub fn range_of(&self, span: Range<usize>) -> LineRange {
        let last = if span.end > span.start {
            span.end - 1
        } else {
            span.start
        };
        LineRange::new(self.line_at(span.start), self.line_at(last))
    }
}

/// Ordered list of tagged lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedText {
    lines: Vec<TaggedLine>,
}

impl TaggedText {
    /// Tag every line of `raw` with its 1-based line number
    pub fn from_source(raw: &str) -> Self {
        let lines = raw
            .lines()
            .enumerate()
            .map(|(i, line)| TaggedLine::new(i + 1, line))
            .collect();
        Self { lines }
    }

    pub fn from_lines(lines: Vec<TaggedLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[TaggedLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [TaggedLine] {
        &mut self.lines
    }

    pub fn into_lines(self) -> Vec<TaggedLine> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Keep only the lines for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&TaggedLine) -> bool) {
        self.lines.retain(keep);
    }

    /// Remove lines that an edit turned blank; original blank lines stay
    pub fn drop_emptied(&mut self) {
        self.lines.retain(|line| !line.was_emptied());
    }

    /// Join all lines with `\n` and build the offset-to-line index
    pub fn joined(&self) -> (String, LineIndex) {
        let mut buf = String::new();
        let mut starts = Vec::with_capacity(self.lines.len());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                buf.push('\n');
            }
            starts.push((buf.len(), line.number));
            buf.push_str(&line.text);
        }
        (buf, LineIndex { starts })
    }

    /// Delete byte ranges of the joined buffer, keeping line provenance
    ///
    /// Ranges may span several lines and are expected in ascending,
    /// non-overlapping order. Lines that a removal blanks are marked as
    /// emptied; a line swallowed entirely by a multi-line range is also
    /// marked, so [`drop_emptied`](Self::drop_emptied) clears both.
    pub fn remove_ranges(&mut self, ranges: &[Range<usize>]) {
        if ranges.is_empty() {
            return;
        }

        let mut offset = 0;
        for line in &mut self.lines {
            let line_span = offset..offset + line.text.len();
            // the newline after this line belongs to no line text
            offset = line_span.end + 1;

            let mut kept = String::with_capacity(line.text.len());
            let mut cursor = line_span.start;
            let mut touched = false;
            for range in ranges {
                if range.end <= line_span.start || range.start >= line_span.end {
                    continue;
                }
                let cut_start = range.start.max(line_span.start);
                let cut_end = range.end.min(line_span.end);
                if cut_start > cursor {
                    kept.push_str(&line.text[cursor - line_span.start..cut_start - line_span.start]);
                }
                cursor = cursor.max(cut_end);
                touched = true;
            }
            if !touched {
                continue;
            }
            if cursor < line_span.end {
                kept.push_str(&line.text[cursor - line_span.start..]);
            }
            if kept.trim().is_empty() {
                line.emptied = true;
            }
            line.text = kept;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_range_display() {
        assert_eq!(LineRange::single(7).to_string(), "7");
        assert_eq!(LineRange::new(3, 5).to_string(), "3..5");
        assert_eq!(LineRange::new(5, 3), LineRange::new(3, 5));
    }

    #[test]
    fn test_from_source_numbers_lines() {
        let text = TaggedText::from_source("a\n\nb\n");
        let numbers: Vec<usize> = text.lines().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(text.lines()[1].is_blank());
    }

    #[test]
    fn test_joined_index_maps_offsets() {
        let text = TaggedText::from_lines(vec![
            TaggedLine::new(4, "ab"),
            TaggedLine::new(9, "日本"),
        ]);
        let (joined, index) = text.joined();
        assert_eq!(joined, "ab\n日本");
        assert_eq!(index.line_at(0), 4);
        assert_eq!(index.line_at(2), 4);
        assert_eq!(index.line_at(3), 9);
        assert_eq!(index.range_of(0..joined.len()), LineRange::new(4, 9));
    }

    #[test]
    fn test_remove_ranges_across_lines() {
        let mut text = TaggedText::from_source("keep \\TODO{one\ntwo\nthree} tail\nnext");
        let (joined, _) = text.joined();
        let start = joined.find("\\TODO").unwrap();
        let end = joined.find('}').unwrap() + 1;
        text.remove_ranges(&[start..end]);
        text.drop_emptied();

        let lines: Vec<(usize, &str)> = text
            .lines()
            .iter()
            .map(|l| (l.number, l.text.as_str()))
            .collect();
        assert_eq!(lines, vec![(1, "keep "), (3, " tail"), (4, "next")]);
    }

    #[test]
    fn test_original_blank_lines_survive_drop() {
        let mut text = TaggedText::from_source("a\n\n% only comment\nb");
        text.lines_mut()[2].set_text(String::new());
        text.drop_emptied();
        let numbers: Vec<usize> = text.lines().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 4]);
    }
}
