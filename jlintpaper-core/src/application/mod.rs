//! Application layer for checking documents
//!
//! This module coordinates the pure domain logic: it runs the preprocessor
//! and segmenters, feeds every unit through the rule tables of a per-file
//! [`Analysis`], and assembles the [`Report`].
//!
//! # Example
//!
//! ```rust
//! use jlintpaper_core::application::Checker;
//!
//! let checker = Checker::default();
//! let source = "\\begin{document}\nこれはペンです．\n\\end{document}\n";
//! let report = checker.check_file(source).unwrap();
//! assert!(report.rule("desu-masu").is_some());
//! ```

pub mod analysis;
pub mod checker;
pub mod config;
pub mod report;

pub use analysis::Analysis;
pub use checker::Checker;
pub use config::{CheckOptions, CheckOptionsBuilder};
pub use report::{Excerpt, OffendingLine, PunctuationWarning, Report, RuleMatches, PLAIN_MARKERS};
