//! Preprocessing of raw LaTeX source into analyzable tagged text
//!
//! The steps run in a fixed order and each rewrites the tagged stream:
//!
//! 1. tag lines with their source line number
//! 2. strip `%` comments (escaped `\%` and `%` inside `\verb` survive)
//! 3. keep only the region between `\begin{document}` and `\end{document}`
//! 4. drop single-line macro definitions
//! 5. remove verbatim-like and `comment` environments, and inline `\verb`
//! 6. remove editorial `\TODO{..}`, `\todo{..}` and `\COM{..}` spans
//! 7. mask citation keys with `*`
//! 8. delete lines emptied by the steps above
//! 9. count punctuation styles per line

use super::punctuation::PunctuationCounters;
use super::text::{TaggedLine, TaggedText};
use crate::error::CheckError;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

const DOCUMENT_START: &str = "\\begin{document}";
const DOCUMENT_END: &str = "\\end{document}";

/// Placeholder left in place of citation keys
pub const CITATION_MASK: &str = "*";

/// Environments whose content is never analyzed
const SKIPPED_ENVIRONMENTS: &[&str] = &[
    "verbatim",
    "verbatim*",
    "Verbatim",
    "lstlisting",
    "minted",
    "comment",
];

static MACRO_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:(?:re)?newcommand|providecommand|(?:re)?newenvironment|def)\b.*$")
        .expect("macro definition pattern")
});

static SKIPPED_BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\begin\{(verbatim\*?|Verbatim|lstlisting|minted|comment)\}")
        .expect("verbatim begin pattern")
});

static INLINE_VERB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\verb\*?([^a-zA-Z\s*])").expect("inline verb pattern"));

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:TODO|todo|COM)(?:\[[^\]]*\])?\{").expect("annotation pattern")
});

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\(?:no)?cite(?:p|t|alp|alt|author|year)?\*?(?:\[[^\]]*\])*\{)[^}]*\}")
        .expect("citation pattern")
});

/// Turn raw source into tagged text, counting punctuation on the way
pub fn prepare(raw: &str, counters: &mut PunctuationCounters) -> Result<TaggedText, CheckError> {
    let mut text = TaggedText::from_source(raw);

    strip_comments(&mut text);
    restrict_to_document(&mut text)?;
    strip_macro_definitions(&mut text);
    strip_skipped_environments(&mut text);
    strip_inline_verb(&mut text);
    strip_annotations(&mut text);
    mask_citations(&mut text);
    text.drop_emptied();

    for line in text.lines() {
        counters.observe(line);
    }

    log::debug!("preprocessed into {} lines", text.len());
    Ok(text)
}

// ============================================================================
// Line-local steps
// ============================================================================

/// Byte offset of the first `%` not escaped by an odd run of backslashes
///
/// A `%` inside an inline `\verb` span is literal text.
pub fn comment_start(line: &str) -> Option<usize> {
    let mut backslashes = 0;
    let mut resume = 0;
    for (i, ch) in line.char_indices() {
        if i < resume {
            continue;
        }
        match ch {
            '\\' if backslashes % 2 == 0 => {
                if let Some(len) = inline_verb_len(&line[i..]) {
                    resume = i + len;
                    continue;
                }
                backslashes += 1;
            }
            '\\' => backslashes += 1,
            '%' if backslashes % 2 == 0 => return Some(i),
            _ => backslashes = 0,
        }
    }
    None
}

/// Length of the `\verb` span opening `text`, closing delimiter included
fn inline_verb_len(text: &str) -> Option<usize> {
    if !text.starts_with("\\verb") {
        return None;
    }
    let caps = INLINE_VERB.captures(text)?;
    let whole = caps.get(0).filter(|m| m.start() == 0)?;
    let delim = caps.get(1)?.as_str();
    text[whole.end()..]
        .find(delim)
        .map(|i| whole.end() + i + delim.len())
}

fn strip_comments(text: &mut TaggedText) {
    for line in text.lines_mut() {
        if let Some(pos) = comment_start(&line.text) {
            let kept = line.text[..pos].to_string();
            line.set_text(kept);
        }
    }
}

fn restrict_to_document(text: &mut TaggedText) -> Result<(), CheckError> {
    let Some(first) = text
        .lines()
        .iter()
        .position(|line| line.text.contains(DOCUMENT_START))
    else {
        log::warn!("no {DOCUMENT_START} found");
        return Err(CheckError::MissingDocumentStart);
    };

    let mut lines: Vec<TaggedLine> = text.lines()[first..].to_vec();
    if let Some(line) = lines.first_mut() {
        let pos = line.text.find(DOCUMENT_START).unwrap_or(0);
        let rest = line.text[pos + DOCUMENT_START.len()..].to_string();
        line.set_text(rest);
    }

    if let Some(last) = lines
        .iter()
        .position(|line| line.text.contains(DOCUMENT_END))
    {
        lines.truncate(last + 1);
        if let Some(line) = lines.last_mut() {
            let pos = line.text.find(DOCUMENT_END).unwrap_or(line.text.len());
            let head = line.text[..pos].to_string();
            line.set_text(head);
        }
    }

    *text = TaggedText::from_lines(lines);
    Ok(())
}

fn strip_macro_definitions(text: &mut TaggedText) {
    for line in text.lines_mut() {
        if let Some(m) = MACRO_DEFINITION.find(&line.text) {
            let kept = line.text[..m.start()].to_string();
            line.set_text(kept);
        }
    }
}

fn mask_citations(text: &mut TaggedText) {
    for line in text.lines_mut() {
        if CITATION.is_match(&line.text) {
            let masked = CITATION
                .replace_all(&line.text, format!("${{1}}{CITATION_MASK}}}"))
                .into_owned();
            line.set_text(masked);
        }
    }
}

// ============================================================================
// Multi-line steps
// ============================================================================

fn strip_skipped_environments(text: &mut TaggedText) {
    let (joined, _) = text.joined();
    let mut ranges = Vec::new();
    let mut pos = 0;

    while let Some(caps) = SKIPPED_BEGIN.captures_at(&joined, pos) {
        let whole = caps.get(0).map_or(pos..pos, |m| m.range());
        let name = caps.get(1).map_or("", |m| m.as_str());
        debug_assert!(SKIPPED_ENVIRONMENTS.contains(&name));

        let end_marker = format!("\\end{{{name}}}");
        let end = joined[whole.end..]
            .find(&end_marker)
            .map_or(joined.len(), |i| whole.end + i + end_marker.len());
        ranges.push(whole.start..end);
        pos = end;
    }

    text.remove_ranges(&ranges);
}

fn strip_inline_verb(text: &mut TaggedText) {
    let (joined, _) = text.joined();
    let mut ranges = Vec::new();
    let mut pos = 0;

    while let Some(caps) = INLINE_VERB.captures_at(&joined, pos) {
        let whole = caps.get(0).map_or(pos..pos, |m| m.range());
        let delim = caps.get(1).map_or("", |m| m.as_str());
        let line_end = joined[whole.end..]
            .find('\n')
            .map_or(joined.len(), |i| whole.end + i);
        let end = joined[whole.end..line_end]
            .find(delim)
            .map_or(line_end, |i| whole.end + i + delim.len());
        ranges.push(whole.start..end);
        pos = end.max(whole.end);
    }

    text.remove_ranges(&ranges);
}

fn strip_annotations(text: &mut TaggedText) {
    let (joined, _) = text.joined();
    let mut ranges = Vec::new();
    let mut pos = 0;

    while let Some(m) = ANNOTATION.find_at(&joined, pos) {
        // the match ends just after the opening brace
        let end = closing_brace(&joined, m.end()).unwrap_or(joined.len());
        ranges.push(m.start()..end);
        pos = end.max(m.end());
    }

    text.remove_ranges(&ranges);
}

/// Offset just past the `}` closing a group whose content starts at `from`
pub fn closing_brace(text: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut escaped = false;
    for (i, ch) in text[from..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte ranges of `figure`/`table` environments (starred forms included)
pub fn float_environments(joined: &str) -> Vec<(String, Range<usize>)> {
    static FLOAT_BEGIN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\\begin\{((?:figure|table)\*?)\}").expect("float begin pattern")
    });

    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(caps) = FLOAT_BEGIN.captures_at(joined, pos) {
        let whole = caps.get(0).map_or(pos..pos, |m| m.range());
        let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let end_marker = format!("\\end{{{name}}}");
        let end = joined[whole.end..]
            .find(&end_marker)
            .map_or(joined.len(), |i| whole.end + i + end_marker.len());
        found.push((name, whole.start..end));
        pos = end;
    }
    found
}
