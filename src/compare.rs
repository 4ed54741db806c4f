//! Pairwise vocabulary overlap between texts.

use log::warn;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::lexical::FrequencyTable;

/// Separator between the two titles of a comparison key.
pub const PAIR_SEPARATOR: &str = "__vs__";

pub fn pair_key(title1: &str, title2: &str) -> String {
    format!("{title1}{PAIR_SEPARATOR}{title2}")
}

/// Shared and exclusive vocabulary of two texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRecord {
    pub text1: String,
    pub text2: String,
    pub overlap_count: usize,
    pub unique_to_text1: usize,
    pub unique_to_text2: usize,
    pub overlap_words: Vec<String>,
}

/// Compare the key sets of two frequency tables.
///
/// `overlap_words` holds the first `overlap_cap` shared words in
/// lexicographic order.
pub fn compare_vocabularies(
    title1: &str,
    vocab1: &FrequencyTable,
    title2: &str,
    vocab2: &FrequencyTable,
    overlap_cap: usize,
) -> ComparisonRecord {
    let mut overlap: Vec<&str> = vocab1.words().filter(|w| vocab2.contains(w)).collect();
    let overlap_count = overlap.len();
    overlap.sort_unstable();
    ComparisonRecord {
        text1: title1.to_string(),
        text2: title2.to_string(),
        overlap_count,
        unique_to_text1: vocab1.len() - overlap_count,
        unique_to_text2: vocab2.len() - overlap_count,
        overlap_words: overlap
            .into_iter()
            .take(overlap_cap)
            .map(str::to_string)
            .collect(),
    }
}

/// All pairwise comparisons of a corpus, keyed by `"{title1}__vs__{title2}"`.
///
/// Keys keep corpus pair order (first text with every later one, and so on).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonMatrix {
    entries: Vec<(String, ComparisonRecord)>,
}

impl ComparisonMatrix {
    /// Compare every unordered pair of `(title, vocabulary)` items.
    pub fn build(texts: &[(&str, &FrequencyTable)], overlap_cap: usize) -> Self {
        let mut matrix = ComparisonMatrix::default();
        for (i, (title1, vocab1)) in texts.iter().enumerate() {
            for (title2, vocab2) in &texts[i + 1..] {
                let record = compare_vocabularies(title1, vocab1, title2, vocab2, overlap_cap);
                matrix.insert(pair_key(title1, title2), record);
            }
        }
        matrix
    }

    fn insert(&mut self, key: String, record: ComparisonRecord) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                warn!("duplicate comparison key '{key}', keeping the later pair");
                slot.1 = record;
            }
            None => self.entries.push((key, record)),
        }
    }

    /// Look up a pair in either order.
    pub fn get(&self, title1: &str, title2: &str) -> Option<&ComparisonRecord> {
        let forward = pair_key(title1, title2);
        let backward = pair_key(title2, title1);
        self.get_key(&forward).or_else(|| self.get_key(&backward))
    }

    pub fn get_key(&self, key: &str) -> Option<&ComparisonRecord> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComparisonRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }
}

impl Serialize for ComparisonMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}
