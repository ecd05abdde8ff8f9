//! Checks on `figure` and `table` environments
//!
//! Runs over the preprocessed text as a whole, independent of paragraph
//! segmentation: caption and label presence, caption placement, English
//! caption punctuation, and whether each label is referenced after it is
//! defined.

use super::preprocess::{closing_brace, float_environments};
use super::text::{LineRange, TaggedText};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\caption\b").expect("caption pattern"));

static ENGLISH_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\ecaption\{").expect("ecaption pattern"));

static INCLUDE_GRAPHICS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\includegraphics\b").expect("includegraphics pattern"));

static TABULAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\begin\{(?:tabular|tabularx|tabular\*|longtable)\}").expect("tabular pattern")
});

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\label\{([^}]*)\}").expect("label pattern"));

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:ref|figref|tabref|autoref|cref|Cref)\*?\{([^}]*)\}")
        .expect("reference pattern")
});

/// Prefixes that `\figref`/`\tabref` style macros add to a label
const LABEL_PREFIXES: [&str; 2] = ["fig:", "tab:"];

/// Problem found in a figure or table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureTableIssue {
    MissingCaption,
    /// Figure caption placed before the image
    CaptionAboveFigure,
    /// Table caption placed after the tabular body
    CaptionBelowTable,
    /// `\ecaption` text without a final period
    EnglishCaptionPeriod { caption: String },
    MissingLabel,
    NotReferenced { label: String },
    /// Every reference to the label precedes its definition
    ReferencedBeforeDefinition { label: String },
}

/// One warning with the environment it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FigureTableWarning {
    /// Environment name as written, e.g. `figure*`
    pub environment: String,
    /// Source lines of the environment
    pub lines: LineRange,
    #[serde(flatten)]
    pub issue: FigureTableIssue,
    pub message: String,
}

impl FigureTableWarning {
    pub fn new(environment: impl Into<String>, lines: LineRange, issue: FigureTableIssue) -> Self {
        let environment = environment.into();
        let message = describe(&environment, &issue);
        Self {
            environment,
            lines,
            issue,
            message,
        }
    }
}

impl fmt::Display for FigureTableWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.lines, self.message)
    }
}

fn describe(environment: &str, issue: &FigureTableIssue) -> String {
    match issue {
        FigureTableIssue::MissingCaption => format!("{environment}環境に\\captionがない"),
        FigureTableIssue::CaptionAboveFigure => {
            "図のキャプションは図の下に置く(\\captionが\\includegraphicsより前にある)".to_string()
        }
        FigureTableIssue::CaptionBelowTable => {
            "表のキャプションは表の上に置く(\\captionがtabularより後にある)".to_string()
        }
        FigureTableIssue::EnglishCaptionPeriod { caption } => {
            format!("英語のキャプション(ecaption)の最後はピリオドが必要 {caption}")
        }
        FigureTableIssue::MissingLabel => format!("{environment}環境に\\labelがない"),
        FigureTableIssue::NotReferenced { label } => {
            format!("図表{{{label}}}は本文から参照されていないようです")
        }
        FigureTableIssue::ReferencedBeforeDefinition { label } => {
            format!("図表{{{label}}}は\\labelより前でしか参照されていないようです")
        }
    }
}

/// A label defined inside a float
struct LabelDef {
    name: String,
    offset: usize,
    environment: String,
    lines: LineRange,
}

/// Check every figure/table environment of the preprocessed text
pub fn check_figure_table(text: &TaggedText) -> Vec<FigureTableWarning> {
    let (joined, index) = text.joined();
    let mut warnings = Vec::new();
    let mut labels = Vec::new();

    for (environment, range) in float_environments(&joined) {
        let body = &joined[range.clone()];
        let lines = index.range_of(range.clone());
        let is_figure = environment.starts_with("figure");
        let mut warn = |issue| warnings.push(FigureTableWarning::new(&environment, lines, issue));

        let caption = CAPTION.find(body).map(|m| m.start());
        match caption {
            None => warn(FigureTableIssue::MissingCaption),
            Some(at) if is_figure => {
                if INCLUDE_GRAPHICS.find(body).is_some_and(|g| at < g.start()) {
                    warn(FigureTableIssue::CaptionAboveFigure);
                }
            }
            Some(at) => {
                if TABULAR.find(body).is_some_and(|t| at > t.start()) {
                    warn(FigureTableIssue::CaptionBelowTable);
                }
            }
        }

        for m in ENGLISH_CAPTION.find_iter(body) {
            // stop before the closing brace
            let end = closing_brace(body, m.end()).map_or(body.len(), |e| e - 1);
            let caption = body[m.end()..end].trim();
            if !caption.ends_with('.') {
                warn(FigureTableIssue::EnglishCaptionPeriod {
                    caption: caption.to_string(),
                });
            }
        }

        match LABEL.captures(body) {
            None => warn(FigureTableIssue::MissingLabel),
            Some(caps) => {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                labels.push(LabelDef {
                    name: name.as_str().to_string(),
                    offset: range.start + whole.start(),
                    environment: environment.clone(),
                    lines,
                });
            }
        }
    }

    let references = references(&joined);
    for label in labels {
        let short = LABEL_PREFIXES
            .iter()
            .find_map(|p| label.name.strip_prefix(p))
            .unwrap_or(&label.name);
        let targeting: Vec<usize> = references
            .iter()
            .filter(|(_, key)| key == &label.name || key == short)
            .map(|&(offset, _)| offset)
            .collect();

        let issue = if targeting.is_empty() {
            FigureTableIssue::NotReferenced {
                label: label.name.clone(),
            }
        } else if targeting.iter().all(|&at| at < label.offset) {
            FigureTableIssue::ReferencedBeforeDefinition {
                label: label.name.clone(),
            }
        } else {
            continue;
        };
        warnings.push(FigureTableWarning::new(label.environment, label.lines, issue));
    }

    log::debug!("figure/table check produced {} warnings", warnings.len());
    warnings
}

/// Every `(offset, key)` referenced in `text`; comma lists are split
fn references(text: &str) -> Vec<(usize, String)> {
    REFERENCE
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
        .flat_map(|(offset, keys)| {
            keys.split(',')
                .map(move |key| (offset, key.trim().to_string()))
        })
        .collect()
}
