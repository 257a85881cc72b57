#![allow(dead_code)]

use kwsearch_core::{Document, IndexArtifacts, IndexBuilder, Normalize, Tokenizer};

/// Splits on whitespace only, for tests that need exact control over tokens.
pub struct Whitespace;

impl Normalize for Whitespace {
    fn normalize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

pub fn movies() -> Vec<Document> {
    vec![
        Document::new(1, "Brave", "a princess with a bow and arrow"),
        Document::new(2, "Cars", "racing cars and speed"),
    ]
}

pub fn library() -> Vec<Document> {
    vec![
        Document::new(10, "The Bear", "A grizzly bear wanders the forest looking for honey."),
        Document::new(3, "Bear Country", "Bears, bears and more bears roam the hills."),
        Document::new(7, "Ocean Deep", "Sharks and whales in the deep blue ocean."),
        Document::new(4, "Forest Song", "Birds sing in the forest at dawn."),
        Document::new(5, "Empty", ""),
    ]
}

pub fn build(corpus: Vec<Document>) -> IndexArtifacts {
    IndexBuilder::new(&Tokenizer::default()).build(corpus).unwrap()
}
