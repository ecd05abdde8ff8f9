//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use jlintpaper_core::Report;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// JSON formatter - outputs one entry per file as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    files: Vec<FileReport>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Path of the checked file
    pub file: PathBuf,
    #[serde(flatten)]
    pub report: Report,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            files: Vec::new(),
        }
    }
}

impl<W: Write + Send> OutputFormatter for JsonFormatter<W> {
    fn format_report(&mut self, path: &Path, report: &Report) -> Result<()> {
        self.files.push(FileReport {
            file: path.to_path_buf(),
            report: report.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.files)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
