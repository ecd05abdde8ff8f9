//! Plain text output formatter
//!
//! The layout is a banner, then for each file one block per rule with one
//! line per excerpt, the punctuation block and the figure/table block.

use super::{Markers, OutputFormatter};
use anyhow::Result;
use jlintpaper_core::{PunctuationStyle, Report};
use std::io::Write;
use std::path::Path;

const RULER: &str = "=====================================================";

/// Text formatter - the report layout meant for reading in a terminal
pub struct TextFormatter<W: Write> {
    writer: W,
    markers: Markers,
    /// Prefix every line reference with the file name
    show_path: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, markers: Markers, show_path: bool) -> Self {
        Self {
            writer,
            markers,
            show_path,
        }
    }

    fn location(&self, path: &Path, lines: impl std::fmt::Display) -> String {
        if self.show_path {
            format!("{}:{lines}", path.display())
        } else {
            lines.to_string()
        }
    }
}

impl<W: Write + Send> OutputFormatter for TextFormatter<W> {
    fn begin(&mut self) -> Result<()> {
        writeln!(self.writer, "{RULER}")?;
        writeln!(self.writer, " 間違った指摘をする可能性が十分あるので注意すること!")?;
        writeln!(
            self.writer,
            " checked by jlintpaper {}",
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.writer, "{RULER}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn format_report(&mut self, path: &Path, report: &Report) -> Result<()> {
        for rule in &report.rules {
            writeln!(self.writer, "=== {} ===", rule.description)?;
            for excerpt in &rule.excerpts {
                let location = self.location(path, excerpt.lines);
                let text = excerpt.render(self.markers.open, self.markers.close);
                writeln!(self.writer, "{location}: {text}")?;
            }
            writeln!(self.writer)?;
        }

        if let Some(warning) = &report.punctuation {
            writeln!(
                self.writer,
                "=== 句読点（。、）と全角のコンマやピリオド（．，）を混ぜて使わないこと ==="
            )?;
            writeln!(
                self.writer,
                "  # 全角ピリオドあるいはカンマを含む行数: {}",
                warning.full_width_lines
            )?;
            writeln!(self.writer, "  # 句読点を含む行数: {}", warning.native_lines)?;
            writeln!(self.writer)?;
            let heading = match warning.minority {
                PunctuationStyle::Native => "句読点が使われている行",
                PunctuationStyle::FullWidth => "全角ピリオドあるいはカンマが使われている行",
            };
            writeln!(self.writer, "  === {heading} ===")?;
            for line in &warning.offending {
                let location = self.location(path, line.line);
                writeln!(self.writer, "{location}: {}", line.text)?;
            }
            writeln!(self.writer)?;
        }

        if !report.figure_table.is_empty() {
            writeln!(self.writer, "=== 図表 ===")?;
            for warning in &report.figure_table {
                let location = self.location(path, warning.lines);
                writeln!(self.writer, "{location}: {}", warning.message)?;
            }
            writeln!(self.writer)?;
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jlintpaper_core::Checker;

    fn render(source: &str, markers: Markers, show_path: bool) -> String {
        let report = Checker::default().check_file(source).unwrap();
        let mut buf = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut buf, markers, show_path);
            formatter.begin().unwrap();
            formatter
                .format_report(Path::new("paper.tex"), &report)
                .unwrap();
            formatter.finish().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_banner_and_rule_block() {
        let out = render(
            "\\begin{document}\nこれはペンです．\n\\end{document}\n",
            Markers::PLAIN,
            false,
        );
        assert!(out.starts_with(RULER));
        assert!(out.contains("checked by jlintpaper"));
        assert!(out.contains("です・ます"));
        assert!(out.contains("\n2: これはペン>>>です．<<<\n"));
    }

    #[test]
    fn test_file_prefix_when_several_files() {
        let out = render(
            "\\begin{document}\nこれはペンです．\n\\end{document}\n",
            Markers::PLAIN,
            true,
        );
        assert!(out.contains("\npaper.tex:2: これはペン>>>です．<<<\n"));
    }

    #[test]
    fn test_color_markers() {
        let out = render(
            "\\begin{document}\nこれはペンです．\n\\end{document}\n",
            Markers::COLOR,
            false,
        );
        assert!(out.contains("これはペン\x1b[1;31mです．\x1b[0m"));
    }

    #[test]
    fn test_punctuation_and_figure_blocks() {
        let out = render(
            "\\begin{document}\n一である．\n二である．\n三である。\n\\begin{table}\n\\end{table}\n\\end{document}\n",
            Markers::PLAIN,
            false,
        );
        assert!(out.contains("  # 全角ピリオドあるいはカンマを含む行数: 2"));
        assert!(out.contains("  # 句読点を含む行数: 1"));
        assert!(out.contains("  === 句読点が使われている行 ===\n4: 三である。\n"));
        assert!(out.contains("=== 図表 ===\n5..6: table環境に\\captionがない\n"));
    }
}
