//! Bracket and quote pairing
//!
//! A small stack-based scanner replaces recursive balanced-group patterns.
//! Delimiters escaped with a backslash and anything inside inline math
//! (`$..$`, `\(..\)`) are ignored.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Kinds of paired delimiters that are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnclosureType {
    /// Half-width parentheses: ( )
    HalfParen,
    /// Full-width parentheses: （ ）
    FullParen,
    /// Japanese quotation marks: 「」
    JapaneseQuote,
    /// Japanese double quotation marks: 『』
    JapaneseDoubleQuote,
    /// LaTeX double quotes: `` ''
    TexQuote,
}

impl EnclosureType {
    pub const ALL: [EnclosureType; 5] = [
        EnclosureType::HalfParen,
        EnclosureType::FullParen,
        EnclosureType::JapaneseQuote,
        EnclosureType::JapaneseDoubleQuote,
        EnclosureType::TexQuote,
    ];

    /// Identifier used in rule tables
    pub fn slug(&self) -> &'static str {
        match self {
            EnclosureType::HalfParen => "half-paren",
            EnclosureType::FullParen => "full-paren",
            EnclosureType::JapaneseQuote => "quote",
            EnclosureType::JapaneseDoubleQuote => "double-quote",
            EnclosureType::TexQuote => "tex-quote",
        }
    }

    fn is_paren(&self) -> bool {
        matches!(self, EnclosureType::HalfParen | EnclosureType::FullParen)
    }
}

/// A delimiter recognized at some position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EnclosureChar {
    enclosure_type: EnclosureType,
    is_opening: bool,
    /// Byte length of the delimiter
    len: usize,
}

fn delimiter_at(rest: &str) -> Option<EnclosureChar> {
    let (enclosure_type, is_opening, len) = if rest.starts_with("``") {
        (EnclosureType::TexQuote, true, 2)
    } else if rest.starts_with("''") {
        (EnclosureType::TexQuote, false, 2)
    } else {
        let ch = rest.chars().next()?;
        let (t, open) = match ch {
            '(' => (EnclosureType::HalfParen, true),
            ')' => (EnclosureType::HalfParen, false),
            '（' => (EnclosureType::FullParen, true),
            '）' => (EnclosureType::FullParen, false),
            '「' => (EnclosureType::JapaneseQuote, true),
            '」' => (EnclosureType::JapaneseQuote, false),
            '『' => (EnclosureType::JapaneseDoubleQuote, true),
            '』' => (EnclosureType::JapaneseDoubleQuote, false),
            _ => return None,
        };
        (t, open, ch.len_utf8())
    };
    Some(EnclosureChar {
        enclosure_type,
        is_opening,
        len,
    })
}

// ============================================================================
// Issues
// ============================================================================

/// Class of a pairing problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueClass {
    /// An opening delimiter that is never closed
    Unclosed(EnclosureType),
    /// A closing delimiter without an opening one
    Unopened(EnclosureType),
    /// A full-width parenthesis closed by a half-width one, or vice versa
    MixedParen,
}

impl fmt::Display for IssueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueClass::Unclosed(t) => write!(f, "unclosed-{}", t.slug()),
            IssueClass::Unopened(t) => write!(f, "unopened-{}", t.slug()),
            IssueClass::MixedParen => write!(f, "mixed-paren"),
        }
    }
}

impl FromStr for IssueClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "mixed-paren" {
            return Ok(IssueClass::MixedParen);
        }
        let (make, slug): (fn(EnclosureType) -> IssueClass, &str) =
            if let Some(slug) = s.strip_prefix("unclosed-") {
                (IssueClass::Unclosed, slug)
            } else if let Some(slug) = s.strip_prefix("unopened-") {
                (IssueClass::Unopened, slug)
            } else {
                return Err(s.to_string());
            };
        EnclosureType::ALL
            .iter()
            .find(|t| t.slug() == slug)
            .map(|&t| make(t))
            .ok_or_else(|| s.to_string())
    }
}

/// One pairing problem and the bytes to highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosureIssue {
    pub class: IssueClass,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Open {
    enclosure_type: EnclosureType,
    start: usize,
    len: usize,
}

impl Open {
    fn unclosed(&self) -> EnclosureIssue {
        EnclosureIssue {
            class: IssueClass::Unclosed(self.enclosure_type),
            span: self.start..self.start + self.len,
        }
    }
}

/// Scan `text` and report every pairing problem, ordered by position
pub fn scan_enclosures(text: &str) -> Vec<EnclosureIssue> {
    let mut issues = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut in_math = false;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if ch == '\\' {
            let next = rest[1..].chars().next();
            match next {
                Some('(') => in_math = true,
                Some(')') => in_math = false,
                _ => {}
            }
            pos += 1 + next.map_or(0, char::len_utf8);
            continue;
        }
        if ch == '$' {
            in_math = !in_math;
            pos += 1;
            continue;
        }
        if in_math {
            pos += ch.len_utf8();
            continue;
        }

        let Some(delim) = delimiter_at(rest) else {
            pos += ch.len_utf8();
            continue;
        };

        if delim.is_opening {
            stack.push(Open {
                enclosure_type: delim.enclosure_type,
                start: pos,
                len: delim.len,
            });
        } else {
            close(&mut stack, &mut issues, delim, pos);
        }
        pos += delim.len;
    }

    issues.extend(stack.iter().map(Open::unclosed));
    issues.sort_by_key(|issue| issue.span.start);
    issues
}

fn close(
    stack: &mut Vec<Open>,
    issues: &mut Vec<EnclosureIssue>,
    delim: EnclosureChar,
    pos: usize,
) {
    let wanted = delim.enclosure_type;

    if let Some(depth) = stack.iter().rposition(|o| o.enclosure_type == wanted) {
        // anything opened after the match is left unclosed
        for open in stack.drain(depth + 1..) {
            issues.push(open.unclosed());
        }
        stack.pop();
        return;
    }

    match stack.last() {
        Some(top) if top.enclosure_type.is_paren() && wanted.is_paren() => {
            issues.push(EnclosureIssue {
                class: IssueClass::MixedParen,
                span: top.start..pos + delim.len,
            });
            stack.pop();
        }
        _ => issues.push(EnclosureIssue {
            class: IssueClass::Unopened(wanted),
            span: pos..pos + delim.len,
        }),
    }
}
