//! # distant_reading
//!
//! Batch "distant reading" of a small corpus of plain-text plays. Every input
//! file is reduced to word frequencies, a sentiment score and readability
//! metrics; all texts are then compared pairwise by vocabulary. The results
//! land in one JSON file that a static visualization reads.
//!
//! The pipeline: [`loader`] → [`tokenize`] → [`lexical`], [`sentiment`],
//! [`style`] → [`compare`] → [`export`].

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

pub mod compare;
pub mod error;
pub mod export;
pub mod lexical;
pub mod loader;
pub mod resources;
pub mod sentiment;
pub mod stopwords;
pub mod style;
pub mod tokenize;

pub use compare::{ComparisonMatrix, ComparisonRecord, compare_vocabularies, pair_key};
pub use error::AnalysisError;
pub use export::{AnalysisBundle, RunMetadata, csv_safe_cell, write_bundle, write_summary_csv};
pub use lexical::{FrequencyTable, TopWords, WordCount};
pub use loader::{Document, discover_inputs};
pub use resources::{CachedLexicon, InlineLexicon, LexiconSource};
pub use sentiment::{Lexicon, SentimentAnalyzer, SentimentScore};
pub use stopwords::StopwordSet;
pub use style::{StyleMetrics, count_syllables, style_metrics};
pub use tokenize::{Tokens, tokenize};

pub const DEFAULT_PATTERN: &str = "pg*.txt";
pub const DEFAULT_OUTPUT: &str = "analysis_data.json";
pub const DEFAULT_TOP_WORDS: usize = 200;
pub const DEFAULT_OVERLAP_CAP: usize = 100;

/// Characters sampled for the language guess.
const LANGUAGE_SAMPLE: usize = 10_000;

/// Everything derived from one input file.
#[derive(Debug, Clone, Serialize)]
pub struct TextRecord {
    pub filename: String,
    pub title: String,
    pub author: String,
    pub bag_of_words: FrequencyTable,
    #[serde(rename = "top_200_words")]
    pub top_words: TopWords,
    pub sentiment: SentimentScore,
    pub style_metrics: StyleMetrics,
}

/// Options for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Directory searched (non-recursively) for input files.
    pub dir: PathBuf,
    /// File name glob of the inputs.
    pub pattern: String,
    pub output: PathBuf,
    pub top_words: usize,
    pub overlap_cap: usize,
    pub remove_stopwords: bool,
    /// Additional stopwords, one per line.
    pub extra_stopwords: Option<PathBuf>,
    pub lexicon_path: PathBuf,
    /// Where to fetch the lexicon from when `lexicon_path` is missing; `None` never fetches.
    pub lexicon_url: Option<String>,
    /// Date recorded in the metadata; today when unset.
    pub analysis_date: Option<NaiveDate>,
    pub summary_csv: Option<PathBuf>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            dir: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            top_words: DEFAULT_TOP_WORDS,
            overlap_cap: DEFAULT_OVERLAP_CAP,
            remove_stopwords: true,
            extra_stopwords: None,
            lexicon_path: PathBuf::from(resources::DEFAULT_LEXICON_PATH),
            lexicon_url: Some(resources::DEFAULT_LEXICON_URL.to_string()),
            analysis_date: None,
            summary_csv: None,
        }
    }
}

impl AnalysisOptions {
    /// The stopword set implied by these options.
    pub fn stopword_set(&self) -> Result<StopwordSet, AnalysisError> {
        if !self.remove_stopwords {
            return Ok(StopwordSet::empty());
        }
        let mut set = StopwordSet::english();
        if let Some(path) = &self.extra_stopwords {
            let added = set.extend_from_file(path)?;
            info!("added {added} stopwords from {}", path.display());
        }
        Ok(set)
    }

    fn date_string(&self) -> String {
        self.analysis_date
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string()
    }
}

/// Outcome of [`run`].
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: PathBuf,
    pub texts: usize,
    pub comparisons: usize,
    /// Console summary, one block per text followed by totals.
    pub summary: String,
}

/// Derive the record of one document.
pub fn analyze_document(
    doc: &Document,
    stopwords: &StopwordSet,
    analyzer: &SentimentAnalyzer,
    opts: &AnalysisOptions,
) -> TextRecord {
    warn_if_not_english(doc);
    let tokens = tokenize(&doc.cleaned, stopwords);
    if tokens.words_all.is_empty() {
        warn!("{}: no words found", doc.filename);
    }
    debug!(
        "{}: {} words, {} after stopword removal, {} sentences",
        doc.filename,
        tokens.words_all.len(),
        tokens.words_no_stop.len(),
        tokens.sentences.len()
    );

    let bag_of_words = FrequencyTable::from_words(&tokens.words_no_stop);
    let top_words = bag_of_words.top_n(opts.top_words);
    TextRecord {
        filename: doc.filename.clone(),
        title: doc.title.clone(),
        author: doc.author.clone(),
        top_words,
        bag_of_words,
        sentiment: analyzer.polarity_scores(&doc.cleaned),
        style_metrics: style_metrics(&tokens.words_all, tokens.sentences.len()),
    }
}

fn warn_if_not_english(doc: &Document) {
    let sample = match doc.cleaned.char_indices().nth(LANGUAGE_SAMPLE) {
        Some((end, _)) => &doc.cleaned[..end],
        None => doc.cleaned.as_str(),
    };
    if let Some(info) = whatlang::detect(sample) {
        if info.is_reliable() && info.lang() != whatlang::Lang::Eng {
            warn!(
                "{}: text looks like {}, stopwords and lexicon are English",
                doc.filename,
                info.lang().eng_name()
            );
        }
    }
}

/// Load and analyse `files` in order, then compare them pairwise.
///
/// Documents are processed in parallel; records keep the order of `files`.
pub fn analyze_corpus(
    files: &[PathBuf],
    stopwords: &StopwordSet,
    analyzer: &SentimentAnalyzer,
    opts: &AnalysisOptions,
) -> Result<AnalysisBundle, AnalysisError> {
    let texts = files
        .par_iter()
        .map(|path| -> Result<TextRecord, AnalysisError> {
            info!("analyzing {}", path.display());
            let doc = Document::load(path)?;
            Ok(analyze_document(&doc, stopwords, analyzer, opts))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(assemble(texts, opts))
}

/// Same as [`analyze_corpus`] for documents already in memory.
pub fn analyze_documents(
    docs: &[Document],
    stopwords: &StopwordSet,
    analyzer: &SentimentAnalyzer,
    opts: &AnalysisOptions,
) -> AnalysisBundle {
    let texts = docs
        .par_iter()
        .map(|doc| analyze_document(doc, stopwords, analyzer, opts))
        .collect();
    assemble(texts, opts)
}

fn assemble(texts: Vec<TextRecord>, opts: &AnalysisOptions) -> AnalysisBundle {
    let vocabularies: Vec<(&str, &FrequencyTable)> = texts
        .iter()
        .map(|t| (t.title.as_str(), &t.bag_of_words))
        .collect();
    let comparisons = ComparisonMatrix::build(&vocabularies, opts.overlap_cap);
    info!("generated {} comparisons", comparisons.len());

    let metadata = RunMetadata {
        total_texts: texts.len(),
        analysis_date: opts.date_string(),
        stopwords_removed: opts.remove_stopwords,
        top_words_count: opts.top_words,
    };
    AnalysisBundle {
        texts,
        comparisons,
        metadata,
    }
}

/// Run the whole pipeline: discover, provision the lexicon, analyse, write.
pub fn run(opts: &AnalysisOptions) -> Result<RunReport, AnalysisError> {
    let files = discover_inputs(&opts.dir, &opts.pattern)?;
    info!("found {} text files to analyze", files.len());

    let stopwords = opts.stopword_set()?;
    let source = CachedLexicon::new(&opts.lexicon_path, opts.lexicon_url.clone());
    let analyzer = SentimentAnalyzer::new(source.load()?);

    let bundle = analyze_corpus(&files, &stopwords, &analyzer, opts)?;
    let output = write_bundle(&bundle, &opts.output)?;
    info!("analysis written to {}", output.display());
    if let Some(path) = &opts.summary_csv {
        write_summary_csv(&bundle.texts, path)?;
        info!("summary table written to {}", path.display());
    }

    Ok(RunReport {
        summary: summarize(&bundle, &output),
        output,
        texts: bundle.texts.len(),
        comparisons: bundle.comparisons.len(),
    })
}

fn summarize(bundle: &AnalysisBundle, output: &Path) -> String {
    let mut out = String::new();
    for t in &bundle.texts {
        out.push_str(&export::text_summary(t));
    }
    let _ = writeln!(out, "\nAnalysis complete! Data saved to {}", output.display());
    let _ = writeln!(out, "  - Texts analyzed: {}", bundle.texts.len());
    let _ = writeln!(out, "  - Comparisons generated: {}", bundle.comparisons.len());
    if let Ok(meta) = fs::metadata(output) {
        let _ = writeln!(out, "  - Output file size: {:.2} KB", meta.len() as f64 / 1024.0);
    }
    out
}

/// Round half away from zero to `places` decimals; never yields `-0.0`.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new(Lexicon::from_pairs([("love", 3.2), ("hate", -2.7)]))
    }

    fn opts() -> AnalysisOptions {
        AnalysisOptions {
            analysis_date: NaiveDate::from_ymd_opt(2025, 11, 23),
            lexicon_url: None,
            ..AnalysisOptions::default()
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.83333, 4), 0.8333);
        assert_eq!(round_to(-0.0001, 2), 0.0);
        assert!(round_to(-0.0001, 2).is_sign_positive());
        assert_eq!(round_to(2.675, 1), 2.7);
    }

    #[test]
    fn record_for_small_document() {
        // without license markers the header lines are part of the analysed text
        let raw = "Title: Tiny\nAuthor: Anon\n\nThe cat sat. The dog ran.";
        let doc = Document::from_text("pg1.txt", raw);
        let r = analyze_document(&doc, &StopwordSet::english(), &analyzer(), &opts());
        assert_eq!(r.title, "Tiny");
        assert_eq!(r.author, "Anon");
        assert_eq!(r.style_metrics.total_words, 10);
        assert_eq!(r.bag_of_words.get("cat"), Some(1));
        assert_eq!(r.bag_of_words.get("the"), None);
        assert_eq!(r.style_metrics.total_sentences, 2);
    }

    #[test]
    fn bundle_invariants() {
        let docs = vec![
            Document::from_text("a.txt", "I love the moon and the stars."),
            Document::from_text("b.txt", "I hate the moon. The sea is wide."),
            Document::from_text("c.txt", ""),
        ];
        let bundle = analyze_documents(&docs, &StopwordSet::english(), &analyzer(), &opts());
        assert_eq!(bundle.metadata.total_texts, 3);
        assert_eq!(bundle.metadata.analysis_date, "2025-11-23");
        assert!(bundle.metadata.stopwords_removed);
        assert_eq!(bundle.comparisons.len(), 3);

        for t in &bundle.texts {
            let m = &t.style_metrics;
            if m.total_words > 0 {
                let expected = round_to(m.unique_words as f64 / m.total_words as f64, 4);
                assert_eq!(m.vocabulary_richness, expected);
            }
        }
        let empty = &bundle.texts[2].style_metrics;
        assert_eq!(empty.total_words, 0);
        assert_eq!(empty.vocabulary_richness, 0.0);
        assert_eq!(bundle.texts[2].sentiment, SentimentScore::default());

        for (_, c) in bundle.comparisons.iter() {
            let a = bundle.texts.iter().find(|t| t.title == c.text1).unwrap();
            let b = bundle.texts.iter().find(|t| t.title == c.text2).unwrap();
            assert_eq!(c.overlap_count + c.unique_to_text1, a.bag_of_words.len());
            assert_eq!(c.overlap_count + c.unique_to_text2, b.bag_of_words.len());
        }
        assert_eq!(bundle.comparisons.get("b", "a").unwrap().overlap_words, vec!["moon"]);
    }

    #[test]
    fn keep_stopwords_marks_metadata() {
        let o = AnalysisOptions {
            remove_stopwords: false,
            ..opts()
        };
        let stop = o.stopword_set().unwrap();
        let docs = vec![Document::from_text("a.txt", "the the cat")];
        let bundle = analyze_documents(&docs, &stop, &analyzer(), &o);
        assert!(!bundle.metadata.stopwords_removed);
        assert_eq!(bundle.texts[0].bag_of_words.get("the"), Some(2));
    }
}
