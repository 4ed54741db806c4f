use std::cmp::Reverse;
use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One distinct word with its count and the position of its first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
    pub first_index: usize,
}

///Counts the occurrences of each word. Entries keep first-encounter order.
/// # Example
/// ```
/// use distant_reading::FrequencyTable;
/// let words: Vec<String> = ["two", "one", "two"].iter().map(|w| w.to_string()).collect();
/// let table = FrequencyTable::from_words(&words);
/// assert_eq!(table.get("two"), Some(2));
/// assert_eq!(table.get("one"), Some(1));
/// assert_eq!(table.words().collect::<Vec<_>>(), vec!["two", "one"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<WordCount>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn from_words(words: &[String]) -> Self {
        let mut table = FrequencyTable::default();
        for (position, word) in words.iter().enumerate() {
            match table.index.get(word) {
                Some(&slot) => table.entries[slot].count += 1,
                None => {
                    table.index.insert(word.clone(), table.entries.len());
                    table.entries.push(WordCount {
                        word: word.clone(),
                        count: 1,
                        first_index: position,
                    });
                }
            }
        }
        table
    }

    pub fn get(&self, word: &str) -> Option<u32> {
        self.index.get(word).map(|&slot| self.entries[slot].count)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordCount> {
        self.entries.iter()
    }

    /// Distinct words in first-encounter order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.word.as_str())
    }

    ///Returns the `n` most frequent words, sorted by count descending.
    ///Equal counts keep first-encounter order.
    /// # Example
    /// ```
    /// use distant_reading::FrequencyTable;
    /// let words: Vec<String> = "b a c a c".split(' ').map(String::from).collect();
    /// let top = FrequencyTable::from_words(&words).top_n(2);
    /// let expected = vec![("a".to_string(), 2), ("c".to_string(), 2)];
    /// assert_eq!(top.to_vec(), expected);
    /// ```
    pub fn top_n(&self, n: usize) -> TopWords {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|e| (Reverse(e.count), e.first_index));
        sorted.truncate(n);
        TopWords(sorted)
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_counts(&self.entries, serializer)
    }
}

/// The highest-count slice of a [`FrequencyTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopWords(Vec<WordCount>);

impl TopWords {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordCount> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<(String, u32)> {
        self.0.iter().map(|e| (e.word.clone(), e.count)).collect()
    }
}

impl Serialize for TopWords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_counts(&self.0, serializer)
    }
}

fn serialize_counts<S: Serializer>(entries: &[WordCount], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for e in entries {
        map.serialize_entry(&e.word, &e.count)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_count() {
        let words = owned(&["one", "two", "two", "three", "three", "three"]);
        let counted = FrequencyTable::from_words(&words);
        assert_eq!(counted.get("one"), Some(1));
        assert_eq!(counted.get("two"), Some(2));
        assert_eq!(counted.get("three"), Some(3));
        assert_eq!(counted.get("four"), None);
        assert_eq!(counted.len(), 3);
        assert_eq!(counted.total(), words.len() as u64);
    }

    #[test]
    fn scenario_cat_sat_dog_ran() {
        let table = FrequencyTable::from_words(&owned(&["cat", "sat", "dog", "ran"]));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"cat":1,"sat":1,"dog":1,"ran":1}"#);
    }

    #[test]
    fn top_words_sorted_with_stable_ties() {
        let words = owned(&["z", "a", "b", "a", "z", "c", "b", "z"]);
        let top = FrequencyTable::from_words(&words).top_n(200);
        assert_eq!(
            top.to_vec(),
            vec![
                ("z".to_string(), 3),
                ("a".to_string(), 2),
                ("b".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn top_words_capped_and_subset_of_table() {
        let words: Vec<String> = (0..300)
            .flat_map(|i| std::iter::repeat(format!("w{i}")).take(1 + i % 7))
            .collect();
        let table = FrequencyTable::from_words(&words);
        let top = table.top_n(200);
        assert_eq!(top.len(), 200);
        let counts: Vec<u32> = top.iter().map(|e| e.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        for e in top.iter() {
            assert_eq!(table.get(&e.word), Some(e.count));
        }
    }

    #[test]
    fn empty_input() {
        let table = FrequencyTable::from_words(&[]);
        assert!(table.is_empty());
        assert!(table.top_n(200).is_empty());
        assert_eq!(serde_json::to_string(&table.top_n(200)).unwrap(), "{}");
    }
}
