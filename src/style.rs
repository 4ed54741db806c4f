//! Vocabulary and readability metrics.

use std::collections::HashSet;

use serde::Serialize;

use crate::round_to;

/// Scalar style description of one text.
///
/// Counts are exact; `vocabulary_richness` carries four decimals and every
/// other ratio two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StyleMetrics {
    pub total_words: usize,
    pub unique_words: usize,
    pub vocabulary_richness: f64,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub gunning_fog: f64,
    pub total_sentences: usize,
}

/// Compute the metrics from the unfiltered word stream and the sentence count.
///
/// Empty input yields zeros instead of dividing by zero.
pub fn style_metrics(words_all: &[String], total_sentences: usize) -> StyleMetrics {
    let total_words = words_all.len();
    let unique_words = words_all.iter().collect::<HashSet<_>>().len();
    let char_count: usize = words_all.iter().map(|w| w.chars().count()).sum();

    let syllables: Vec<usize> = words_all.iter().map(|w| count_syllables(w)).collect();
    let syllable_count: usize = syllables.iter().sum();
    let complex_words = syllables.iter().filter(|&&s| s >= 3).count();

    let readability =
        Readability::new(total_words, total_sentences, syllable_count, complex_words);

    StyleMetrics {
        total_words,
        unique_words,
        vocabulary_richness: round_to(ratio(unique_words, total_words), 4),
        avg_word_length: round_to(ratio(char_count, total_words), 2),
        avg_sentence_length: round_to(ratio(total_words, total_sentences), 2),
        flesch_reading_ease: round_to(readability.flesch_reading_ease(), 2),
        flesch_kincaid_grade: round_to(readability.flesch_kincaid_grade(), 2),
        gunning_fog: round_to(readability.gunning_fog(), 2),
        total_sentences,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Raw counts behind the readability formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readability {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    pub complex_words: usize,
}

impl Readability {
    pub fn new(words: usize, sentences: usize, syllables: usize, complex_words: usize) -> Self {
        Readability {
            words,
            sentences,
            syllables,
            complex_words,
        }
    }

    fn defined(&self) -> bool {
        self.words > 0 && self.sentences > 0
    }

    fn words_per_sentence(&self) -> f64 {
        ratio(self.words, self.sentences)
    }

    fn syllables_per_word(&self) -> f64 {
        ratio(self.syllables, self.words)
    }

    pub fn flesch_reading_ease(&self) -> f64 {
        if !self.defined() {
            return 0.0;
        }
        206.835 - 1.015 * self.words_per_sentence() - 84.6 * self.syllables_per_word()
    }

    pub fn flesch_kincaid_grade(&self) -> f64 {
        if !self.defined() {
            return 0.0;
        }
        0.39 * self.words_per_sentence() + 11.8 * self.syllables_per_word() - 15.59
    }

    pub fn gunning_fog(&self) -> f64 {
        if !self.defined() {
            return 0.0;
        }
        0.4 * (self.words_per_sentence() + 100.0 * ratio(self.complex_words, self.words))
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

///Estimate the syllables of an English word by counting vowel groups.
///Silent final "e", "-ed" and "-es" are discounted; "-le" after a consonant counts.
/// # Example
/// ```
/// use distant_reading::count_syllables;
/// assert_eq!(count_syllables("cat"), 1);
/// assert_eq!(count_syllables("table"), 2);
/// assert_eq!(count_syllables("beautiful"), 3);
/// ```
pub fn count_syllables(word: &str) -> usize {
    let chars: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if chars.is_empty() {
        return 0;
    }
    if chars.len() <= 3 {
        return 1;
    }

    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &chars {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = chars.len();
    let consonant_at = |i: usize| !is_vowel(chars[i]);
    let silent = match (chars[n - 2], chars[n - 1]) {
        ('l', 'e') => !consonant_at(n - 3),
        (_, 'e') => true,
        ('e', 'd') => consonant_at(n - 3) && !matches!(chars[n - 3], 't' | 'd'),
        ('e', 's') => {
            consonant_at(n - 3) && !matches!(chars[n - 3], 's' | 'x' | 'z' | 'c' | 'g' | 'h')
        }
        _ => false,
    };
    if silent && count > 1 {
        count -= 1;
    }
    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn syllable_heuristic() {
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("makes"), 1);
        assert_eq!(count_syllables("boxes"), 2);
        assert_eq!(count_syllables("jumped"), 1);
        assert_eq!(count_syllables("wanted"), 2);
        assert_eq!(count_syllables("readability"), 5);
        assert_eq!(count_syllables("rhythm"), 1);
        assert_eq!(count_syllables(""), 0);
    }

    #[test]
    fn counts_and_richness() {
        let words = owned(&["the", "cat", "sat", "the", "dog", "ran"]);
        let m = style_metrics(&words, 2);
        assert_eq!(m.total_words, 6);
        assert_eq!(m.unique_words, 5);
        assert_eq!(m.total_sentences, 2);
        assert_eq!(m.vocabulary_richness, 0.8333);
        assert_eq!(m.avg_word_length, 3.0);
        assert_eq!(m.avg_sentence_length, 3.0);
    }

    #[test]
    fn readability_formulas() {
        // 6 one-syllable words in 2 sentences
        let words = owned(&["the", "cat", "sat", "the", "dog", "ran"]);
        let m = style_metrics(&words, 2);
        assert_eq!(m.flesch_reading_ease, 119.19);
        assert_eq!(m.flesch_kincaid_grade, -2.62);
        assert_eq!(m.gunning_fog, 1.2);

        let r = Readability::new(100, 5, 150, 10);
        assert!((r.flesch_reading_ease() - (206.835 - 1.015 * 20.0 - 84.6 * 1.5)).abs() < 1e-9);
        assert!((r.flesch_kincaid_grade() - (0.39 * 20.0 + 11.8 * 1.5 - 15.59)).abs() < 1e-9);
        assert!((r.gunning_fog() - 0.4 * (20.0 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn empty_document_is_all_zero() {
        let m = style_metrics(&[], 0);
        assert_eq!(m, StyleMetrics::default());
    }

    #[test]
    fn words_without_sentences_do_not_divide_by_zero() {
        let m = style_metrics(&owned(&["alas"]), 0);
        assert_eq!(m.total_words, 1);
        assert_eq!(m.vocabulary_richness, 1.0);
        assert_eq!(m.avg_sentence_length, 0.0);
        assert_eq!(m.flesch_reading_ease, 0.0);
    }
}
