//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use jlintpaper_core::Report;
use std::io::Write;
use std::path::Path;

/// Markdown formatter - one section per file, one list per rule
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    match_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            match_count: 0,
        }
    }
}

impl<W: Write + Send> OutputFormatter for MarkdownFormatter<W> {
    fn format_report(&mut self, path: &Path, report: &Report) -> Result<()> {
        writeln!(self.writer, "# {}", path.display())?;
        writeln!(self.writer)?;

        for rule in &report.rules {
            writeln!(self.writer, "## {}", rule.description)?;
            writeln!(self.writer)?;
            for excerpt in &rule.excerpts {
                writeln!(
                    self.writer,
                    "- {}: {}",
                    excerpt.lines,
                    excerpt.render("**", "**")
                )?;
            }
            writeln!(self.writer)?;
        }
        self.match_count += report.match_count();

        if let Some(warning) = &report.punctuation {
            let (dominant, minority) = (warning.dominant.marks(), warning.minority.marks());
            writeln!(self.writer, "## 句読点の混在")?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{dominant}が多数派 ({} 行と {} 行)．{minority}を含む行:",
                warning.full_width_lines, warning.native_lines
            )?;
            writeln!(self.writer)?;
            for line in &warning.offending {
                writeln!(self.writer, "- {}: {}", line.line, line.text)?;
            }
            writeln!(self.writer)?;
        }

        if !report.figure_table.is_empty() {
            writeln!(self.writer, "## 図表")?;
            writeln!(self.writer)?;
            for warning in &report.figure_table {
                writeln!(self.writer, "- {}: {}", warning.lines, warning.message)?;
            }
            writeln!(self.writer)?;
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total matches: {}*", self.match_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
