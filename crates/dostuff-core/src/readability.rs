//! Readability and keyword metrics for page copy.
//!
//! Both functions are pure: they read a string and return a report. Inputs
//! without words or sentences produce zero counts and no score rather than
//! dividing by zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];
/// Letters that keep a trailing `e`/`es` audible.
const SUFFIX_KEEPERS: &[char] = &['l', 'a', 'e', 'i', 'o', 'u', 'y'];

/// Flesch Reading Ease bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadabilityLabel {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Fairly Easy")]
    FairlyEasy,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Fairly Difficult")]
    FairlyDifficult,
    #[serde(rename = "Difficult")]
    Difficult,
    #[serde(rename = "Very Confusing")]
    VeryConfusing,
}

impl ReadabilityLabel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::VeryEasy,
            s if s >= 80.0 => Self::Easy,
            s if s >= 70.0 => Self::FairlyEasy,
            s if s >= 60.0 => Self::Standard,
            s if s >= 50.0 => Self::FairlyDifficult,
            s if s >= 30.0 => Self::Difficult,
            _ => Self::VeryConfusing,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryEasy => "Very Easy",
            Self::Easy => "Easy",
            Self::FairlyEasy => "Fairly Easy",
            Self::Standard => "Standard",
            Self::FairlyDifficult => "Fairly Difficult",
            Self::Difficult => "Difficult",
            Self::VeryConfusing => "Very Confusing",
        }
    }
}

impl fmt::Display for ReadabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadabilityReport {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
    /// Words per sentence, one decimal.
    pub avg_sentence_length: f64,
    /// Syllables per word, one decimal.
    pub avg_syllables_per_word: f64,
    /// Flesch Reading Ease rounded to a whole number; `None` without words
    /// or sentences.
    pub flesch_score: Option<f64>,
    pub readability: Option<ReadabilityLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordReport {
    pub keyword_density: BTreeMap<String, usize>,
    pub total_words: usize,
    /// Sum of keyword occurrences as a percentage of `total_words`.
    pub keyword_percentage: f64,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimate the syllables of one whitespace-separated token by counting
/// vowel groups.
///
/// The token is taken as-is: punctuation stays attached and only lowercase
/// vowels count, so `"cake."` keeps its final `e` and `"EXAM"` has none. A
/// silent trailing `e`, `ed` or `es` is removed first, then a leading `y`;
/// every remaining run of vowels counts as one syllable.
#[must_use]
pub fn count_syllables(word: &str) -> usize {
    let chars: Vec<char> = word.chars().collect();

    let silent_before = |i: usize| !SUFFIX_KEEPERS.contains(&chars[i]);
    let n = chars.len();
    let cut = if n >= 3 && chars[n - 2..] == ['e', 's'] && silent_before(n - 3) {
        3
    } else if n >= 2 && chars[n - 2..] == ['e', 'd'] {
        2
    } else if n >= 2 && chars[n - 1] == 'e' && silent_before(n - 2) {
        2
    } else {
        0
    };

    let stem = &chars[..n - cut];
    let stem = stem.strip_prefix(&['y']).unwrap_or(stem);

    let mut runs = 0;
    let mut in_run = false;
    for c in stem {
        let vowel = VOWELS.contains(c);
        if vowel && !in_run {
            runs += 1;
        }
        in_run = vowel;
    }
    runs
}

/// Flesch Reading Ease analysis of `text`.
#[must_use]
pub fn analyze_readability(text: &str) -> ReadabilityReport {
    let sentences = count_sentences(text);
    let words = count_words(text);
    let syllables: usize = text.split_whitespace().map(count_syllables).sum();

    if sentences == 0 || words == 0 {
        return ReadabilityReport {
            sentences,
            words,
            syllables,
            avg_sentence_length: 0.0,
            avg_syllables_per_word: 0.0,
            flesch_score: None,
            readability: None,
        };
    }

    let avg_sentence_length = ratio(words, sentences);
    let avg_syllables_per_word = ratio(syllables, words);
    let flesch = 206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables_per_word;

    ReadabilityReport {
        sentences,
        words,
        syllables,
        avg_sentence_length: round_one_decimal(avg_sentence_length),
        avg_syllables_per_word: round_one_decimal(avg_syllables_per_word),
        flesch_score: Some(flesch.round()),
        readability: Some(ReadabilityLabel::from_score(flesch)),
    }
}

/// Case-insensitive keyword occurrence counts over `text`.
///
/// Keywords match as literal substrings, non-overlapping. Empty keywords
/// count zero.
#[must_use]
pub fn analyze_keywords<S: AsRef<str>>(text: &str, keywords: &[S]) -> KeywordReport {
    let haystack = text.to_lowercase();
    let keyword_density: BTreeMap<String, usize> = keywords
        .iter()
        .map(|keyword| {
            let keyword = keyword.as_ref();
            let needle = keyword.to_lowercase();
            let count = if needle.is_empty() {
                0
            } else {
                haystack.matches(needle.as_str()).count()
            };
            (keyword.to_owned(), count)
        })
        .collect();

    let total_words = count_words(text);
    let occurrences: usize = keyword_density.values().sum();
    let keyword_percentage = if total_words == 0 {
        0.0
    } else {
        ratio(occurrences, total_words) * 100.0
    };

    KeywordReport {
        keyword_density,
        total_words,
        keyword_percentage,
    }
}
