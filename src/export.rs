use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;

use crate::TextRecord;
use crate::compare::ComparisonMatrix;
use crate::error::AnalysisError;

/// Run-level facts written next to the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub total_texts: usize,
    pub analysis_date: String,
    pub stopwords_removed: bool,
    pub top_words_count: usize,
}

/// The complete output artifact read by the visualization.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisBundle {
    pub texts: Vec<TextRecord>,
    pub comparisons: ComparisonMatrix,
    pub metadata: RunMetadata,
}

impl AnalysisBundle {
    /// Pretty JSON with two-space indentation; non-ASCII text is written as is.
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

///Write the bundle as JSON to `path` in one atomic step.
///The file is written to a temporary sibling and then moved over `path`.
pub fn write_bundle(bundle: &AnalysisBundle, path: &Path) -> Result<PathBuf, AnalysisError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| AnalysisError::io(dir, e))?;

    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| AnalysisError::io(dir, e))?;
    // Served as a static asset, so it must be world-readable.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| AnalysisError::io(tmp.path(), e))?;
    }
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, bundle)?;
        writer.write_all(b"\n").map_err(|e| AnalysisError::io(path, e))?;
        writer.flush().map_err(|e| AnalysisError::io(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| AnalysisError::io(path, e.error))?;
    Ok(path.to_path_buf())
}

/// Neutralize spreadsheet formula triggers at the start of a cell.
///
/// A leading `=`, `+`, `-`, `@`, tab or carriage return gets a `'` prefix.
/// Cells already starting with `'` are returned unchanged.
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

const SUMMARY_HEADER: [&str; 12] = [
    "filename",
    "title",
    "author",
    "total_words",
    "unique_words",
    "vocabulary_richness",
    "total_sentences",
    "avg_sentence_length",
    "flesch_reading_ease",
    "flesch_kincaid_grade",
    "gunning_fog",
    "compound",
];

/// One row per text with the headline metrics.
pub fn write_summary_csv(texts: &[TextRecord], path: &Path) -> Result<PathBuf, AnalysisError> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(SUMMARY_HEADER)?;
    for t in texts {
        let m = &t.style_metrics;
        wtr.write_record([
            csv_safe_cell(t.filename.clone()),
            csv_safe_cell(t.title.clone()),
            csv_safe_cell(t.author.clone()),
            m.total_words.to_string(),
            m.unique_words.to_string(),
            m.vocabulary_richness.to_string(),
            m.total_sentences.to_string(),
            m.avg_sentence_length.to_string(),
            m.flesch_reading_ease.to_string(),
            m.flesch_kincaid_grade.to_string(),
            m.gunning_fog.to_string(),
            t.sentiment.compound.to_string(),
        ])?;
    }
    wtr.flush().map_err(|e| AnalysisError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Human-readable lines for one analysed text.
pub fn text_summary(t: &TextRecord) -> String {
    let m = &t.style_metrics;
    format!(
        "{} ({}) by {}\n  - Total words: {}\n  - Unique words: {}\n  - Vocabulary richness: {}\n  - Sentences: {}\n  - Sentiment (compound): {}\n",
        t.title,
        t.filename,
        t.author,
        m.total_words,
        m.unique_words,
        m.vocabulary_richness,
        m.total_sentences,
        t.sentiment.compound
    )
}
