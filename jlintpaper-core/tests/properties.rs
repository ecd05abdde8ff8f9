//! Property-based tests for segmentation and analysis

use proptest::prelude::*;

use jlintpaper_core::domain::paragraph::split_paragraphs;
use jlintpaper_core::domain::preprocess::prepare;
use jlintpaper_core::domain::punctuation::PunctuationCounters;
use jlintpaper_core::domain::text::TaggedText;
use jlintpaper_core::Checker;

/// Prose lines without markup
const PLAIN_LINES: &[&str] = &[
    "本手法は高速である．",
    "続く文章の",
    "値は１である。",
    "二文目です．三文目？",
    "英語 words と混在する",
    "",
];

/// Lines mixing prose with the markup the preprocessor and segmenter handle
const MARKUP_LINES: &[&str] = &[
    "本手法は高速である．",
    "これは\\cite{foo2023}に示す．",
    "なので，速い",
    "\\section{導入}",
    "% コメント行",
    "文の途中% 注釈",
    "\\item 項目である．",
    "(括弧の中",
    "閉じ)である．",
    "\\TODO{あとで直す}",
    "関数$log x$である．",
    "",
];

fn lines_strategy(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(pool), 0..24)
}

fn document(lines: &[&str]) -> String {
    format!("\\begin{{document}}\n{}\n\\end{{document}}\n", lines.join("\n"))
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Paragraphs of plain prose reproduce the text, modulo whitespace
    #[test]
    fn paragraphs_partition_plain_text(lines in lines_strategy(PLAIN_LINES)) {
        let text = TaggedText::from_source(&lines.join("\n"));
        let paragraphs = split_paragraphs(&text);

        let rebuilt: String = paragraphs.iter().map(|p| without_whitespace(p.text())).collect();
        let original: String = lines.iter().map(|l| without_whitespace(l)).collect();
        prop_assert_eq!(rebuilt, original);
    }

    /// Sentences reproduce their paragraph, modulo whitespace
    #[test]
    fn sentences_reconstruct_paragraph(lines in lines_strategy(MARKUP_LINES)) {
        let text = TaggedText::from_source(&lines.join("\n"));
        for paragraph in split_paragraphs(&text) {
            let rebuilt: String = paragraph
                .sentences()
                .iter()
                .map(|s| without_whitespace(&s.text))
                .collect();
            prop_assert_eq!(rebuilt, without_whitespace(paragraph.text()));
        }
    }

    /// Sentence line ranges are ordered and cover the paragraph without gaps
    #[test]
    fn sentence_ranges_cover_paragraph(lines in lines_strategy(MARKUP_LINES)) {
        let text = TaggedText::from_source(&lines.join("\n"));
        for paragraph in split_paragraphs(&text) {
            let sentences = paragraph.sentences();
            prop_assert!(!sentences.is_empty());

            let span = paragraph.line_range();
            prop_assert_eq!(sentences[0].lines.start, span.start);
            prop_assert_eq!(sentences[sentences.len() - 1].lines.end, span.end);

            let numbers: Vec<usize> = paragraph.lines().iter().map(|l| l.number).collect();
            for pair in sentences.windows(2) {
                let (prev, next) = (pair[0].lines, pair[1].lines);
                prop_assert!(prev.start <= prev.end);
                prop_assert!(next.start >= prev.end);
                prop_assert!(!numbers.iter().any(|&n| n > prev.end && n < next.start));
            }
        }
    }

    /// Preprocessing its own output changes nothing
    #[test]
    fn preprocessing_is_idempotent(lines in lines_strategy(MARKUP_LINES)) {
        let mut counters = PunctuationCounters::new();
        let once = prepare(&document(&lines), &mut counters).unwrap();
        let once_text: Vec<String> = once.lines().iter().map(|l| l.text.clone()).collect();

        let again_source = document(&once_text.iter().map(String::as_str).collect::<Vec<_>>());
        let twice = prepare(&again_source, &mut PunctuationCounters::new()).unwrap();
        let twice_text: Vec<String> = twice.lines().iter().map(|l| l.text.clone()).collect();

        prop_assert_eq!(once_text, twice_text);
    }

    /// Citation keys never survive preprocessing
    #[test]
    fn citation_keys_masked(lines in lines_strategy(MARKUP_LINES)) {
        let mut counters = PunctuationCounters::new();
        let prepared = prepare(&document(&lines), &mut counters).unwrap();
        prop_assert!(prepared.lines().iter().all(|l| !l.text.contains("foo2023")));
    }

    /// Two runs over the same document give the same report
    #[test]
    fn analysis_is_deterministic(lines in lines_strategy(MARKUP_LINES)) {
        let checker = Checker::default();
        let source = document(&lines);
        prop_assert_eq!(checker.check_file(&source), checker.check_file(&source));
    }

    /// Excerpts of every rule come in source order
    #[test]
    fn excerpts_in_source_order(lines in lines_strategy(MARKUP_LINES)) {
        let checker = Checker::default();
        let report = checker.check_file(&document(&lines)).unwrap();
        for rule in &report.rules {
            for pair in rule.excerpts.windows(2) {
                prop_assert!(pair[0].lines.start <= pair[1].lines.start);
            }
        }
    }
}
