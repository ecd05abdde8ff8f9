//! Style checking engine for Japanese academic manuscripts written in LaTeX
//!
//! The checker is heuristic: it flags sentences and paragraphs that likely
//! break Japanese technical-writing conventions, and false positives are
//! expected.
//!
//! # Architecture
//!
//! - **Domain layer**: preprocessing into line-tagged text, paragraph and
//!   sentence segmentation, bracket pairing, figure/table checks
//! - **Rules**: rule tables as data, compiled from TOML into matchers
//! - **Application layer**: the per-file analysis context and the report
//!
//! # Example
//!
//! ```rust
//! use jlintpaper_core::{CheckOptions, Checker, RuleSet};
//!
//! let checker = Checker::new(CheckOptions {
//!     rules: RuleSet::builtin(),
//! });
//!
//! let source = "\\begin{document}\n速いなので，採用した．\n\\end{document}\n";
//! let report = checker.check_file(source).unwrap();
//!
//! let matches = report.rule("colloquial-because").unwrap();
//! assert_eq!(matches.excerpts[0].lines.to_string(), "2");
//! assert_eq!(matches.excerpts[0].render(">>>", "<<<"), "速い>>>なので<<<，採用した．");
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod rules;

pub use application::{
    Analysis, CheckOptions, CheckOptionsBuilder, Checker, Excerpt, OffendingLine,
    PunctuationWarning, Report, RuleMatches, PLAIN_MARKERS,
};
pub use domain::{
    FigureTableIssue, FigureTableWarning, LineRange, Paragraph, PunctuationStyle, Sentence,
};
pub use error::{CheckError, ConfigError};
pub use rules::{Rule, RuleSet, Scope};
