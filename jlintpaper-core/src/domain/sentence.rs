//! Sentence segmentation within a paragraph
//!
//! Lines are appended to a remainder buffer one at a time. A wrapped CJK
//! sentence is glued back together without a space; anything else gets a
//! single space so that English words do not run into each other. The buffer
//! is cut after every terminal mark.

use super::text::{LineRange, TaggedLine};
use serde::Serialize;

/// Characters that end a sentence
pub const TERMINAL_MARKS: [char; 4] = ['。', '．', '?', '？'];

/// A sentence and the source lines it spans
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    /// Sentence text with line breaks folded away
    pub text: String,
    /// First and last source line of the sentence
    pub lines: LineRange,
}

impl Sentence {
    pub fn new(text: impl Into<String>, lines: LineRange) -> Self {
        Self {
            text: text.into(),
            lines,
        }
    }
}

/// Whether `ch` is a terminal mark
pub fn is_terminal(ch: char) -> bool {
    TERMINAL_MARKS.contains(&ch)
}

/// Append a wrapped line to `buf`
///
/// Joins without a separator when both sides of the seam are non-ASCII,
/// otherwise inserts one space. Returns the offset where `line` starts.
pub fn append_wrapped(buf: &mut String, line: &str) -> usize {
    if buf.is_empty() {
        buf.push_str(line);
        return 0;
    }
    let tail_wide = buf.chars().last().is_some_and(|c| !c.is_ascii());
    let head_wide = line.chars().next().is_some_and(|c| !c.is_ascii());
    if !(tail_wide && head_wide) {
        buf.push(' ');
    }
    let start = buf.len();
    buf.push_str(line);
    start
}

/// Split the lines of one paragraph into sentences
pub fn split_sentences(lines: &[TaggedLine]) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut remain = String::new();
    let mut start: Option<usize> = None;

    for line in lines {
        let text = line.text.trim();
        if text.is_empty() {
            continue;
        }
        if remain.is_empty() {
            start = Some(line.number);
        }
        append_wrapped(&mut remain, text);

        while let Some((pos, ch)) = remain.char_indices().find(|&(_, c)| is_terminal(c)) {
            let cut = pos + ch.len_utf8();
            let sentence = remain[..cut].trim();
            if !sentence.is_empty() {
                let first = start.unwrap_or(line.number);
                sentences.push(Sentence::new(sentence, LineRange::new(first, line.number)));
            }
            remain = remain[cut..].trim_start().to_string();
            start = if remain.is_empty() {
                None
            } else {
                Some(line.number)
            };
        }
    }

    let rest = remain.trim();
    if !rest.is_empty() {
        let last = lines.last().map_or(0, |l| l.number);
        let first = start.unwrap_or(last);
        sentences.push(Sentence::new(rest, LineRange::new(first, last)));
    }

    sentences
}
