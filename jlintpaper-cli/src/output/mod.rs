//! Output formatting module

use anyhow::Result;
use jlintpaper_core::{Report, PLAIN_MARKERS};
use std::path::Path;

/// Trait for output formatters
pub trait OutputFormatter: Send {
    /// Write anything that precedes the first report
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Format and output the report of one file
    fn format_report(&mut self, path: &Path, report: &Report) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Delimiters written around the matched part of an excerpt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub open: &'static str,
    pub close: &'static str,
}

impl Markers {
    /// `>>>match<<<`
    pub const PLAIN: Markers = Markers {
        open: PLAIN_MARKERS.0,
        close: PLAIN_MARKERS.1,
    };

    /// Bold red on ANSI terminals
    pub const COLOR: Markers = Markers {
        open: "\x1b[1;31m",
        close: "\x1b[0m",
    };

    pub fn select(plain: bool) -> Self {
        if plain {
            Self::PLAIN
        } else {
            Self::COLOR
        }
    }
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;
