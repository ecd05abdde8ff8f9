//! Paragraph segmentation
//!
//! Figure and table environments are cut out first; they are checked on
//! their own. The rest is split at blank lines and at structural commands
//! (sectioning, `\item`, `\par`, page breaks, `\begin`/`\end`), which close
//! the current paragraph and are themselves discarded.

use super::preprocess::float_environments;
use super::sentence::{append_wrapped, split_sentences, Sentence};
use super::text::{LineIndex, LineRange, TaggedLine, TaggedText};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static STRUCTURAL_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\\(?:part|chapter|section|subsection|subsubsection|paragraph|subparagraph)\*?(?:\[[^\]]*\])?\{",
        r"|\\item\b(?:\s*\[[^\]]*\])?",
        r"|\\(?:par|newpage|clearpage|cleardoublepage|maketitle)\b",
        r"|\\begin\{[^}]*\}(?:\[[^\]]*\])?",
        r"|\\end\{[^}]*\}",
    ))
    .expect("structural boundary pattern")
});

/// One logical paragraph with its sentences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    lines: Vec<TaggedLine>,
    text: String,
    index: LineIndex,
    sentences: Vec<Sentence>,
}

impl Paragraph {
    /// Build a paragraph from its tagged lines and derive its sentences
    pub fn new(lines: Vec<TaggedLine>) -> Self {
        let mut text = String::new();
        let mut index = LineIndex::default();
        for line in &lines {
            let trimmed = line.text.trim();
            if trimmed.is_empty() {
                continue;
            }
            let at = append_wrapped(&mut text, trimmed);
            index.push(at, line.number);
        }
        let sentences = split_sentences(&lines);
        Self {
            lines,
            text,
            index,
            sentences,
        }
    }

    pub fn lines(&self) -> &[TaggedLine] {
        &self.lines
    }

    /// Paragraph text with wrapped lines folded together
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Source lines covered by the paragraph
    pub fn line_range(&self) -> LineRange {
        let first = self.lines.first().map_or(0, |l| l.number);
        let last = self.lines.last().map_or(first, |l| l.number);
        LineRange::new(first, last)
    }

    /// Source lines covered by a byte span of [`text`](Self::text)
    pub fn lines_of(&self, span: Range<usize>) -> LineRange {
        self.index.range_of(span)
    }
}

/// Split preprocessed text into paragraphs
pub fn split_paragraphs(text: &TaggedText) -> Vec<Paragraph> {
    let mut text = text.clone();
    let (joined, _) = text.joined();
    let floats: Vec<Range<usize>> = float_environments(&joined)
        .into_iter()
        .map(|(_, range)| range)
        .collect();
    text.remove_ranges(&floats);
    text.drop_emptied();

    let mut paragraphs = Vec::new();
    let mut current: Vec<TaggedLine> = Vec::new();
    let mut open_title = 0;

    for line in text.lines() {
        if line.is_blank() {
            open_title = 0;
            close(&mut current, &mut paragraphs);
            continue;
        }

        let mut pos = 0;
        for boundary in structural_boundaries(&line.text, &mut open_title) {
            push_fragment(&mut current, line.number, &line.text[pos..boundary.start]);
            close(&mut current, &mut paragraphs);
            pos = boundary.end;
        }
        push_fragment(&mut current, line.number, &line.text[pos..]);
    }
    close(&mut current, &mut paragraphs);

    log::debug!("split into {} paragraphs", paragraphs.len());
    paragraphs
}

/// Byte ranges of structural commands within one line
///
/// `open_title` is the brace depth of a heading title still open at the
/// start of the line, zero when there is none. A title that wraps keeps
/// swallowing lines until its closing brace.
fn structural_boundaries(line: &str, open_title: &mut usize) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut pos = 0;
    if *open_title > 0 {
        let end = title_end(line, 0, open_title).unwrap_or(line.len());
        found.push(0..end);
        pos = end;
    }
    while *open_title == 0 {
        let Some(m) = STRUCTURAL_BOUNDARY.find_at(line, pos) else {
            break;
        };
        let end = if m.as_str().ends_with('{') {
            // a heading swallows its title
            *open_title = 1;
            title_end(line, m.end(), open_title).unwrap_or(line.len())
        } else {
            m.end()
        };
        found.push(m.start()..end);
        pos = end.max(m.end());
    }
    found
}

/// Offset just past the `}` that brings `depth` to zero, scanning from `from`
fn title_end(line: &str, from: usize, depth: &mut usize) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in line[from..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => *depth += 1,
            '}' => {
                *depth -= 1;
                if *depth == 0 {
                    return Some(from + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn push_fragment(current: &mut Vec<TaggedLine>, number: usize, fragment: &str) {
    if !fragment.trim().is_empty() {
        current.push(TaggedLine::new(number, fragment));
    }
}

fn close(current: &mut Vec<TaggedLine>, paragraphs: &mut Vec<Paragraph>) {
    if !current.is_empty() {
        paragraphs.push(Paragraph::new(std::mem::take(current)));
    }
}
