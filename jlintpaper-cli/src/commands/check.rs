//! Check command implementation

use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{
    JsonFormatter, Markers, MarkdownFormatter, OutputFormatter, TextFormatter,
};
use anyhow::{Context, Result};
use clap::Args;
use jlintpaper_core::{CheckOptions, Checker, Paragraph};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Input files or patterns (supports glob)
    #[arg(value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Mark matches with >>> and <<< instead of colour
    #[arg(long)]
    pub plain: bool,

    /// Print paragraphs and sentences instead of checking them
    #[arg(long)]
    pub debug_segments: bool,

    /// Rule table to use instead of the built-in one
    #[arg(short, long, value_name = "FILE", env = "JLINTPAPER_RULES")]
    pub rules: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rule blocks with one line per match
    Text,
    /// JSON array with one report per file
    Json,
    /// Markdown sections per file and rule
    Markdown,
}

impl CheckArgs {
    /// Execute the check command
    ///
    /// Returns 1 when some file could not be checked, 0 otherwise.
    pub fn execute(&self) -> Result<u8> {
        super::init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {self:?}");

        let checker = Checker::new(self.options()?);
        let files = resolve_patterns(&self.input)?;
        log::info!("Checking {} file(s)", files.len());

        let writer = self.open_output()?;
        if self.debug_segments {
            return self.dump_segments(&checker, &files, writer);
        }

        let mut formatter = self.create_formatter(writer, files.len() > 1);
        formatter.begin()?;

        let mut status = 0;
        for path in &files {
            let text = FileReader::read_text(path)?;
            match checker.check_file(&text) {
                Ok(report) => {
                    log::info!(
                        "{}: {} rule match(es)",
                        path.display(),
                        report.match_count()
                    );
                    formatter.format_report(path, &report)?;
                }
                Err(err) => {
                    eprintln!("{}: {err}", path.display());
                    status = 1;
                }
            }
        }

        formatter.finish()?;
        Ok(status)
    }

    fn options(&self) -> Result<CheckOptions> {
        let Some(path) = &self.rules else {
            return Ok(CheckOptions::default());
        };
        let builder = CheckOptions::builder()
            .rules_file(path)
            .map_err(|err| CliError::RuleTable {
                path: path.clone(),
                reason: err.to_string(),
            })?;
        Ok(builder.build())
    }

    fn open_output(&self) -> Result<Box<dyn Write + Send>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(io::stdout())),
        }
    }

    /// Colour only makes sense on a terminal
    fn markers(&self) -> Markers {
        let colour = !self.plain && self.output.is_none() && io::stdout().is_terminal();
        Markers::select(!colour)
    }

    fn create_formatter(
        &self,
        writer: Box<dyn Write + Send>,
        multiple_files: bool,
    ) -> Box<dyn OutputFormatter> {
        match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(
                writer,
                self.markers(),
                multiple_files,
            )),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }

    fn dump_segments(
        &self,
        checker: &Checker,
        files: &[PathBuf],
        mut writer: Box<dyn Write + Send>,
    ) -> Result<u8> {
        let mut status = 0;
        for path in files {
            let text = FileReader::read_text(path)?;
            match checker.segments(&text) {
                Ok(paragraphs) => write_segments(&mut writer, path, &paragraphs)?,
                Err(err) => {
                    eprintln!("{}: {err}", path.display());
                    status = 1;
                }
            }
        }
        writer.flush()?;
        Ok(status)
    }
}

fn write_segments(writer: &mut dyn Write, path: &Path, paragraphs: &[Paragraph]) -> Result<()> {
    writeln!(writer, "# {}", path.display())?;
    for paragraph in paragraphs {
        writeln!(writer, "[paragraph {}]", paragraph.line_range())?;
        for sentence in paragraph.sentences() {
            writeln!(
                writer,
                "  {}: {}",
                sentence.lines,
                sentence.text.replace('\n', " ")
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str) -> CheckArgs {
        CheckArgs {
            input: vec![input.to_string()],
            output: None,
            format: OutputFormat::Text,
            plain: true,
            debug_segments: false,
            rules: None,
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_plain_flag_selects_plain_markers() {
        assert_eq!(args("a.tex").markers(), Markers::PLAIN);
    }

    #[test]
    fn test_output_file_is_never_coloured() {
        let mut args = args("a.tex");
        args.plain = false;
        args.output = Some(PathBuf::from("out.txt"));
        assert_eq!(args.markers(), Markers::PLAIN);
    }

    #[test]
    fn test_missing_rule_table() {
        let mut args = args("a.tex");
        args.rules = Some(PathBuf::from("/nonexistent/rules.toml"));
        let err = args.options().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::RuleTable { .. })
        ));
    }

    #[test]
    fn test_write_segments() {
        let paragraphs = Checker::default()
            .segments("\\begin{document}\n一つ目．二つ\n目．\n\n三つ目．\n\\end{document}\n")
            .unwrap();
        let mut buf = Vec::new();
        write_segments(&mut buf, Path::new("a.tex"), &paragraphs).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "# a.tex\n[paragraph 2..3]\n  2: 一つ目．\n  2..3: 二つ目．\n[paragraph 5]\n  5: 三つ目．\n"
        );
    }
}
