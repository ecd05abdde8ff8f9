//! Domain layer: text model, preprocessing and segmentation
//!
//! Everything here is pure and per-document. Line provenance is kept in
//! [`TaggedLine`] through every rewrite so that paragraphs, sentences and
//! figure/table warnings can point back at source lines.

pub mod enclosure;
pub mod figure_table;
pub mod paragraph;
pub mod preprocess;
pub mod punctuation;
pub mod sentence;
pub mod text;

pub use enclosure::{scan_enclosures, EnclosureIssue, EnclosureType, IssueClass};
pub use figure_table::{check_figure_table, FigureTableIssue, FigureTableWarning};
pub use paragraph::{split_paragraphs, Paragraph};
pub use preprocess::prepare;
pub use punctuation::{PunctuationCounters, PunctuationStyle, StyleUsage};
pub use sentence::{split_sentences, Sentence, TERMINAL_MARKS};
pub use text::{LineIndex, LineRange, TaggedLine, TaggedText};
