use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{M}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    // Contractions are absent: punctuation is stripped before lookup, so "don't" never reaches this set.
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Maps raw text to the token stream that the index and every query are built from.
///
/// Implementations must be total and deterministic: the same text always yields the
/// same tokens, and no input is rejected.
pub trait Normalize {
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// Default normalizer: NFKC, lowercase, punctuation and apostrophe stripping, stopword
/// removal and English stemming.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    // None means the built-in English list.
    stopwords: Option<HashSet<String>>,
}

impl Tokenizer {
    pub fn new() -> Self { Self::default() }

    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { stopwords: Some(stopwords) }
    }

    /// Load a stopword list with one word per line. Blank lines are ignored.
    pub fn from_stopwords_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::with_stopwords(contents.lines()))
    }

    fn is_stopword(&self, token: &str) -> bool {
        match &self.stopwords {
            Some(words) => words.contains(token),
            None => STOPWORDS.contains(token),
        }
    }
}

impl Normalize for Tokenizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.nfkc().collect::<String>().to_lowercase();
        let stripped: String = lowered.chars().filter(|&c| !is_stripped(c)).collect();
        WORD.find_iter(&stripped)
            .map(|m| m.as_str())
            .filter(|token| !self.is_stopword(token))
            .map(|token| STEMMER.stem(token).into_owned())
            .collect()
    }
}

// ASCII punctuation plus the typographic apostrophes, so "don’t" and "don't" both become "dont".
fn is_stripped(c: char) -> bool {
    c.is_ascii_punctuation() || matches!(c, '\u{2018}' | '\u{2019}' | '\u{02BC}')
}

/// Normalize `text` with the built-in stopword list.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().normalize(text)
}
