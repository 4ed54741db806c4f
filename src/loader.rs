//! Input discovery and document loading.
//!
//! A [`Document`] is built from one plain-text file: the raw text is decoded,
//! the Project Gutenberg license header and footer are cut away and the
//! `Title:`/`Author:` fields are read from the top of the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use globset::Glob;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use walkdir::WalkDir;

use crate::error::AnalysisError;

/// Number of leading raw lines scanned for `Title:` and `Author:`.
pub const METADATA_WINDOW: usize = 30;

pub const UNKNOWN_AUTHOR: &str = "Unknown";

static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    marker(r"\*\*\*\s*START\s+OF\s+TH(?:IS|E)\s+PROJECT\s+GUTENBERG\s+E-?BOOK.*?\*\*\*")
});

static END_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    marker(r"\*\*\*\s*END\s+OF\s+TH(?:IS|E)\s+PROJECT\s+GUTENBERG\s+E-?BOOK.*?\*\*\*")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

fn marker(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("valid marker pattern")
}

/// One source text, alive only until its record has been derived.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub title: String,
    pub author: String,
    pub raw: String,
    pub cleaned: String,
}

impl Document {
    /// Build a document from already decoded text.
    pub fn from_text(filename: impl Into<String>, raw: impl Into<String>) -> Self {
        let filename = filename.into();
        let raw = raw.into();
        let (title, author) = extract_metadata(&raw, &filename);
        let cleaned = clean_text(&raw);
        Document {
            filename,
            title,
            author,
            raw,
            cleaned,
        }
    }

    /// Read and prepare a document from disk.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let raw = read_source(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Document::from_text(filename, raw))
    }
}

/// List the files in `dir` whose file name matches `pattern`, sorted by name.
///
/// Only the directory itself is searched; subdirectories are ignored.
pub fn discover_inputs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, AnalysisError> {
    let matcher = Glob::new(pattern)
        .map_err(|e| AnalysisError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?
        .compile_matcher();

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| matcher.is_match(e.file_name()))
        .map(|e| e.into_path())
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if files.is_empty() {
        return Err(AnalysisError::NoInputFiles {
            pattern: pattern.to_string(),
            dir: dir.to_path_buf(),
        });
    }
    Ok(files)
}

/// Read a text file as UTF-8, falling back to Latin-1 for legacy encodings.
pub fn read_source(path: &Path) -> Result<String, AnalysisError> {
    let bytes = fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(decode(bytes, path))
}

fn decode(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(mut text) => {
            if text.starts_with('\u{feff}') {
                text.drain(..'\u{feff}'.len_utf8());
            }
            text
        }
        Err(e) => {
            warn!("{} is not valid UTF-8, reading as Latin-1", path.display());
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Cut the license header and footer around the actual work.
///
/// A missing marker is not an error: the text is kept on that side.
pub fn strip_boilerplate(text: &str) -> &str {
    let mut body = text;
    match START_MARKER.find(body) {
        Some(m) => body = &body[m.end()..],
        None => debug!("no start marker found, keeping leading text"),
    }
    match END_MARKER.find(body) {
        Some(m) => body = &body[..m.start()],
        None => debug!("no end marker found, keeping trailing text"),
    }
    body.trim()
}

/// Boilerplate-free text with every whitespace run collapsed to one space.
pub fn clean_text(raw: &str) -> String {
    WHITESPACE
        .replace_all(strip_boilerplate(raw), " ")
        .trim()
        .to_string()
}

/// Title and author from the labeled header lines.
///
/// Falls back to the file stem and [`UNKNOWN_AUTHOR`].
pub fn extract_metadata(raw: &str, filename: &str) -> (String, String) {
    let mut title = None;
    let mut author = None;
    for line in raw.lines().take(METADATA_WINDOW) {
        let line = line.trim_start_matches('\u{feff}');
        if let Some(value) = labeled(line, "Title:") {
            title = Some(value);
        } else if let Some(value) = labeled(line, "Author:") {
            author = Some(value);
        }
    }

    let title = title.unwrap_or_else(|| {
        warn!("{filename}: no Title: line, using file name");
        Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string())
    });
    let author = author.unwrap_or_else(|| {
        warn!("{filename}: no Author: line");
        UNKNOWN_AUTHOR.to_string()
    });
    (title, author)
}

fn labeled(line: &str, label: &str) -> Option<String> {
    let value = line.strip_prefix(label)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
