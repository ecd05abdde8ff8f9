//! Document checker orchestrating preprocessing, segmentation and rules

use super::analysis::Analysis;
use super::config::CheckOptions;
use super::report::Report;
use crate::domain::figure_table::check_figure_table;
use crate::domain::paragraph::{split_paragraphs, Paragraph};
use crate::domain::preprocess::prepare;
use crate::domain::punctuation::PunctuationCounters;
use crate::error::CheckError;

/// Checks whole documents against a rule table
#[derive(Debug, Clone, Default)]
pub struct Checker {
    options: CheckOptions,
}

impl Checker {
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Analyze one document
    ///
    /// Paragraph rules run on each paragraph and sentence rules on each of
    /// its sentences; the figure/table check runs on the preprocessed text.
    pub fn check_file(&self, text: &str) -> Result<Report, CheckError> {
        let mut analysis = Analysis::new(self.options.rules.clone());
        let prepared = prepare(text, analysis.counters_mut())?;

        let paragraphs = split_paragraphs(&prepared);
        let mut sentences = 0;
        for paragraph in &paragraphs {
            analysis.evaluate_paragraph(paragraph);
            for sentence in paragraph.sentences() {
                analysis.evaluate_sentence(sentence);
                sentences += 1;
            }
        }
        log::debug!(
            "evaluated {} paragraphs and {} sentences",
            paragraphs.len(),
            sentences
        );

        analysis.record_figure_table(check_figure_table(&prepared));
        Ok(analysis.finish())
    }

    /// Paragraphs and their sentences as the rules see them
    pub fn segments(&self, text: &str) -> Result<Vec<Paragraph>, CheckError> {
        let mut counters = PunctuationCounters::new();
        let prepared = prepare(text, &mut counters)?;
        Ok(split_paragraphs(&prepared))
    }
}
