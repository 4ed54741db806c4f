//! Rule-based polarity scoring in the style of VADER.
//!
//! Every word found in the [`Lexicon`] contributes its mean valence. The
//! valence is then shifted by the words around it: boosters ("very") and
//! dampeners ("slightly"), negations within three words, ALL-CAPS emphasis,
//! a handful of idioms, and a contrastive "but". The summed valence is
//! squashed into `[-1, 1]` to form the compound score.

use std::collections::HashMap;

use serde::Serialize;

use crate::round_to;

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerable" | "considerably"
        | "decidedly" | "deeply" | "effing" | "enormous" | "enormously" | "entirely"
        | "especially" | "exceptional" | "exceptionally" | "extreme" | "extremely"
        | "fabulously" | "flipping" | "flippin" | "frackin" | "fracking" | "fricking"
        | "frickin" | "frigging" | "friggin" | "fully" | "fuckin" | "fucking" | "fuggin"
        | "fugging" | "greatly" | "hella" | "highly" | "hugely" | "incredible" | "incredibly"
        | "intensely" | "major" | "majorly" | "more" | "most" | "particularly" | "purely"
        | "quite" | "really" | "remarkably" | "so" | "substantially" | "thoroughly" | "total"
        | "totally" | "tremendous" | "tremendously" | "uber" | "unbelievably" | "unusually"
        | "utter" | "utterly" | "very" => Some(B_INCR),
        "almost" | "barely" | "hardly" | "just enough" | "kind of" | "kinda" | "kindof"
        | "kind-of" | "less" | "little" | "marginal" | "marginally" | "occasional"
        | "occasionally" | "partly" | "scarce" | "scarcely" | "slight" | "slightly"
        | "somewhat" | "sort of" | "sorta" | "sortof" | "sort-of" => Some(B_DECR),
        _ => None,
    }
}

fn special_idiom(phrase: &str) -> Option<f64> {
    match phrase {
        "the shit" | "the bomb" => Some(3.0),
        "bad ass" | "badass" => Some(1.5),
        "yeah right" => Some(-2.0),
        "kiss of death" => Some(-1.5),
        "to die for" => Some(3.0),
        "beating heart" => Some(3.1),
        "break a leg" => Some(2.0),
        "cut the mustard" => Some(2.0),
        "hand to mouth" => Some(-2.0),
        "back handed" => Some(-2.0),
        "blow smoke" => Some(-2.0),
        "blowing smoke" => Some(-2.0),
        "upper hand" => Some(1.0),
        "heart breaker" | "heartbreaker" => Some(-2.0),
        "cooking with gas" => Some(2.0),
        "in the black" => Some(2.0),
        "in the red" => Some(-2.0),
        "on the ball" => Some(2.0),
        "under the weather" => Some(-2.0),
        _ => None,
    }
}

/// Word to mean valence mapping.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Parse the tab-separated `token<TAB>mean<TAB>...` lexicon format.
    ///
    /// Lines without a numeric second column are skipped.
    pub fn parse(content: &str) -> Self {
        let valences = content
            .lines()
            .filter_map(|line| {
                let mut fields = line.split('\t');
                let token = fields.next()?.trim();
                let mean = fields.next()?.trim().parse::<f64>().ok()?;
                (!token.is_empty()).then(|| (token.to_lowercase(), mean))
            })
            .collect();
        Lexicon { valences }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Lexicon {
            valences: pairs
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
        }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.valences.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// Polarity proportions and the normalized compound score, rounded to three decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentScore {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub compound: f64,
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
}

/// Tokens of one scored text, with their lowercase forms precomputed.
struct SentiText<'a> {
    words: Vec<&'a str>,
    lower: Vec<String>,
    cap_differential: bool,
}

impl<'a> SentiText<'a> {
    fn new(text: &'a str) -> Self {
        // single-character tokens ("I", "a", "O") never take part in scoring
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| w.chars().count() > 1)
            .map(strip_punctuation)
            .collect();
        let lower = words.iter().map(|w| w.to_lowercase()).collect();
        let all_caps = words.iter().filter(|w| is_upper(w)).count();
        SentiText {
            cap_differential: all_caps > 0 && all_caps < words.len(),
            words,
            lower,
        }
    }
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        SentimentAnalyzer { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score a whole text. An empty text scores zero on every axis.
    pub fn polarity_scores(&self, text: &str) -> SentimentScore {
        let t = SentiText::new(text);
        let mut sentiments = Vec::with_capacity(t.words.len());
        for i in 0..t.lower.len() {
            let item = t.lower[i].as_str();
            let modifier = booster(item).is_some()
                || (item == "kind" && t.lower.get(i + 1).is_some_and(|next| next == "of"));
            if modifier {
                sentiments.push(0.0);
            } else {
                sentiments.push(self.valence_at(&t, i));
            }
        }
        but_check(&t.lower, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence_at(&self, t: &SentiText, i: usize) -> f64 {
        let words = &t.lower;
        let item = words[i].as_str();
        let Some(base) = self.lexicon.get(item) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" directly before a scored word acts as a negation, not a valence
        if item == "no" && words.get(i + 1).is_some_and(|w| self.lexicon.contains(w)) {
            valence = 0.0;
        }
        if (i > 0 && words[i - 1] == "no")
            || (i > 1 && words[i - 2] == "no")
            || (i > 2 && words[i - 3] == "no" && matches!(words[i - 1].as_str(), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if t.cap_differential && is_upper(t.words[i]) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start_i in 0..3 {
            if i <= start_i {
                break;
            }
            let prev = i - (start_i + 1);
            if self.lexicon.contains(&words[prev]) {
                continue;
            }
            let mut scalar = scalar_inc_dec(t, prev, valence);
            if start_i == 1 {
                scalar *= 0.95;
            } else if start_i == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            valence = negation_check(valence, words, start_i, i);
            if start_i == 2 {
                valence = special_idioms_check(valence, words, i);
            }
        }

        self.least_check(valence, words, i)
    }

    fn least_check(&self, valence: f64, words: &[String], i: usize) -> f64 {
        let after_least = |j: usize| !self.lexicon.contains(&words[j]) && words[j] == "least";
        if i > 1 && after_least(i - 1) {
            if words[i - 2] != "at" && words[i - 2] != "very" {
                return valence * N_SCALAR;
            }
        } else if i > 0 && after_least(i - 1) {
            return valence * N_SCALAR;
        }
        valence
    }
}

fn scalar_inc_dec(t: &SentiText, j: usize, valence: f64) -> f64 {
    let Some(mut scalar) = booster(&t.lower[j]) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if t.cap_differential && is_upper(t.words[j]) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

fn negated(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

fn negation_check(valence: f64, words: &[String], start_i: usize, i: usize) -> f64 {
    let w = |back: usize| words[i - back].as_str();
    match start_i {
        0 if negated(w(1)) => valence * N_SCALAR,
        1 if w(2) == "never" && matches!(w(1), "so" | "this") => valence * 1.25,
        1 if w(2) == "without" && w(1) == "doubt" => valence,
        1 if negated(w(2)) => valence * N_SCALAR,
        2 if w(3) == "never"
            && (matches!(w(2), "so" | "this") || matches!(w(1), "so" | "this")) =>
        {
            valence * 1.25
        }
        2 if w(3) == "without" && (w(2) == "doubt" || w(1) == "doubt") => valence,
        2 if negated(w(3)) => valence * N_SCALAR,
        _ => valence,
    }
}

fn special_idioms_check(mut valence: f64, words: &[String], i: usize) -> f64 {
    let w = |j: usize| words[j].as_str();
    let one_zero = format!("{} {}", w(i - 1), w(i));
    let two_one_zero = format!("{} {} {}", w(i - 2), w(i - 1), w(i));
    let two_one = format!("{} {}", w(i - 2), w(i - 1));
    let three_two_one = format!("{} {} {}", w(i - 3), w(i - 2), w(i - 1));
    let three_two = format!("{} {}", w(i - 3), w(i - 2));

    let preceding = [&one_zero, &two_one_zero, &two_one, &three_two_one, &three_two];
    if let Some(v) = preceding.iter().find_map(|seq| special_idiom(seq)) {
        valence = v;
    }
    if i + 1 < words.len() {
        if let Some(v) = special_idiom(&format!("{} {}", w(i), w(i + 1))) {
            valence = v;
        }
    }
    if i + 2 < words.len() {
        if let Some(v) = special_idiom(&format!("{} {} {}", w(i), w(i + 1), w(i + 2))) {
            valence = v;
        }
    }

    for ngram in [&three_two_one, &three_two, &two_one] {
        if let Some(b) = booster(ngram) {
            valence += b;
        }
    }
    valence
}

/// Sentiment before "but" is halved, sentiment after it weighs 1.5 times.
fn but_check(words: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = words.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, s) in sentiments.iter_mut().enumerate() {
        if idx < pivot {
            *s *= 0.5;
        } else if idx > pivot {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = match text.matches('?').count() {
        n @ 2..=3 => n as f64 * 0.18,
        n if n > 3 => 0.96,
        _ => 0.0,
    };
    exclamations + questions
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn score_valence(sentiments: &[f64], text: &str) -> SentimentScore {
    if sentiments.is_empty() {
        return SentimentScore::default();
    }
    let emphasis = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > f64::abs(neg_sum) {
        pos_sum += emphasis;
    } else if pos_sum < f64::abs(neg_sum) {
        neg_sum -= emphasis;
    }

    let total = pos_sum + f64::abs(neg_sum) + neu_count;
    SentimentScore {
        positive: round_to(f64::abs(pos_sum / total), 3),
        negative: round_to(f64::abs(neg_sum / total), 3),
        neutral: round_to(f64::abs(neu_count / total), 3),
        compound: round_to(compound, 3),
    }
}

/// Strip surrounding ASCII punctuation unless that leaves two chars or fewer,
/// which keeps emoticons like ":)" intact.
fn strip_punctuation(token: &str) -> &str {
    let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
    if stripped.chars().count() <= 2 {
        token
    } else {
        stripped
    }
}

fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new(Lexicon::from_pairs([
            ("good", 1.9),
            ("great", 3.1),
            ("bad", -2.5),
            ("love", 3.2),
            ("hate", -2.7),
            ("no", -1.2),
        ]))
    }

    #[test]
    fn parse_lexicon_file_format() {
        let lex = Lexicon::parse("good\t1.9\t0.9434\t[2, 1, 2]\n:)\t2.0\t1.18\t[]\nbroken line\n");
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.get("good"), Some(1.9));
        assert_eq!(lex.get(":)"), Some(2.0));
    }

    #[test]
    fn empty_text_is_neutral_zero() {
        assert_eq!(analyzer().polarity_scores(""), SentimentScore::default());
    }

    #[test]
    fn single_positive_word() {
        let s = analyzer().polarity_scores("The food is good");
        assert_eq!(s.compound, 0.44);
        assert_eq!(s.positive, 0.492);
        assert_eq!(s.neutral, 0.508);
        assert_eq!(s.negative, 0.0);
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        let a = analyzer();
        let with_pronoun = a.polarity_scores("I love it");
        assert_eq!(with_pronoun, a.polarity_scores("love it"));
        assert_eq!(with_pronoun.positive, 0.808);
        assert_eq!(with_pronoun.neutral, 0.192);
        assert_eq!(with_pronoun.compound, 0.637);
        // "a" no longer sits between the negation and the scored word
        assert_eq!(
            a.polarity_scores("not a good play").compound,
            a.polarity_scores("not good play").compound
        );
    }

    #[test]
    fn negation_flips_polarity() {
        let s = analyzer().polarity_scores("The food is not good");
        assert_eq!(s.compound, -0.341);
        assert!(s.negative > 0.0);
    }

    #[test]
    fn booster_caps_and_exclamation_intensify() {
        let a = analyzer();
        let plain = a.polarity_scores("the food is good").compound;
        assert!(a.polarity_scores("the food is very good").compound > plain);
        assert!(a.polarity_scores("the food is GOOD").compound > plain);
        assert!(a.polarity_scores("the food is good!").compound > plain);
        assert!(a.polarity_scores("the food is slightly good").compound < plain);
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        let s = analyzer().polarity_scores("good but bad");
        assert_eq!(s.compound, -0.586);
    }

    #[test]
    fn scores_are_bounded_and_deterministic() {
        let a = analyzer();
        let text = "I love love love this great great good thing! ".repeat(50);
        let first = a.polarity_scores(&text);
        assert!(first.compound <= 1.0 && first.compound >= -1.0);
        assert_eq!(first, a.polarity_scores(&text));
        let sum = first.positive + first.negative + first.neutral;
        assert!((sum - 1.0).abs() < 0.01);
    }
}
