//! Sentence and word segmentation.

use unicode_segmentation::UnicodeSegmentation;

use crate::stopwords::StopwordSet;

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "st", "jr", "sr", "vs", "etc", "viz", "mt", "prof", "capt", "col",
    "gen", "lt", "rev", "sgt", "hon", "esq", "cf", "ibid", "vol", "ch",
];

const CLITICS: &[&str] = &["'s", "'ll", "'re", "'ve", "'m", "'d"];

/// Word and sentence streams derived from one cleaned text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokens<'a> {
    pub sentences: Vec<&'a str>,
    pub words_all: Vec<String>,
    pub words_no_stop: Vec<String>,
}

/// Segment `text` into sentences and both word streams.
pub fn tokenize<'a>(text: &'a str, stopwords: &StopwordSet) -> Tokens<'a> {
    let words_all = words(text);
    let words_no_stop = remove_stopwords(&words_all, stopwords);
    Tokens {
        sentences: sentences(text),
        words_all,
        words_no_stop,
    }
}

/// Split text into sentences on Unicode sentence boundaries.
///
/// A boundary directly after an abbreviation such as "Mr." or a single
/// initial is joined back. Fragments without letters or digits are dropped.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;

    for (idx, segment) in text.split_sentence_bound_indices() {
        let from = *start.get_or_insert(idx);
        end = idx + segment.len();
        if ends_with_abbreviation(segment) {
            continue;
        }
        push_sentence(&mut out, &text[from..end]);
        start = None;
    }
    if let Some(from) = start {
        push_sentence(&mut out, &text[from..end]);
    }
    out
}

fn push_sentence<'a>(out: &mut Vec<&'a str>, candidate: &'a str) {
    let candidate = candidate.trim();
    if candidate.chars().any(char::is_alphanumeric) {
        out.push(candidate);
    }
}

fn ends_with_abbreviation(segment: &str) -> bool {
    let Some(body) = segment.trim_end().strip_suffix('.') else {
        return false;
    };
    let last = body
        .rsplit(|c: char| !c.is_alphabetic())
        .next()
        .unwrap_or_default();
    if last.is_empty() {
        return false;
    }
    let before = &body[..body.len() - last.len()];
    let standalone =
        before.is_empty() || before.ends_with(char::is_whitespace) || before.ends_with('.');
    if !standalone {
        return false;
    }
    if ABBREVIATIONS.contains(&last.to_lowercase().as_str()) {
        return true;
    }
    is_initial(last) && !follows_heading(before)
}

// "ACT V." and "SCENE X." end with a numeral, not an initial.
fn follows_heading(before: &str) -> bool {
    let previous = before.split_whitespace().next_back().unwrap_or_default();
    previous.chars().count() > 1
        && previous.chars().all(char::is_alphabetic)
        && previous.chars().all(char::is_uppercase)
}

// "W." in "W. Shakespeare"; the pronoun "I" and the article "A" end sentences.
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_uppercase() && c != 'I' && c != 'A',
        _ => false,
    }
}

/// Lowercased, purely alphabetic word tokens in document order.
///
/// Contraction clitics are split off ("don't" keeps "do", "king's" keeps
/// "king"); tokens with digits, underscores or other marks are dropped.
pub fn words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .unicode_words()
        .filter_map(host_word)
        .filter(|w| !w.is_empty() && w.chars().all(char::is_alphabetic))
        .map(str::to_string)
        .collect()
}

fn host_word(word: &str) -> Option<&str> {
    if !word.contains(['\'', '\u{2019}']) {
        return Some(word);
    }
    let normalized = word.replace('\u{2019}', "'");
    let stem_len = match normalized.strip_suffix("n't") {
        Some(stem) => stem.len(),
        None => {
            let clitic = CLITICS.iter().find(|c| normalized.ends_with(*c))?;
            normalized.len() - clitic.len()
        }
    };
    // Apostrophe-free stems have the same byte length in both spellings.
    if normalized[..stem_len].contains('\'') {
        return None;
    }
    Some(&word[..stem_len])
}

/// `words` without the members of `stopwords`.
pub fn remove_stopwords(words: &[String], stopwords: &StopwordSet) -> Vec<String> {
    words
        .iter()
        .filter(|w| !stopwords.contains(w))
        .cloned()
        .collect()
}
