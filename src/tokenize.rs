use regex::Regex;
use std::collections::hash_map::{self, HashMap};
use std::sync::OnceLock;

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    // \w is Unicode-aware: alphanumerics plus underscore
    WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Word to occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: HashMap<String, u32>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: impl Into<String>, count: u32) {
        if count == 0 {
            return;
        }
        *self.counts.entry(word.into()).or_insert(0) += count;
    }

    pub fn get(&self, word: &str) -> u32 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, u32> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Sums counts for shared words and keeps the rest.
    pub fn merge(&self, other: &FrequencyMap) -> FrequencyMap {
        let mut merged = self.clone();
        for (word, &count) in &other.counts {
            merged.add(word.as_str(), count);
        }
        merged
    }

    /// The `k` most frequent words, count descending, equal counts in
    /// lexicographic order.
    pub fn top_k(&self, k: usize) -> Vec<(&str, u32)> {
        let mut sorted: Vec<(&str, u32)> = self
            .counts
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted.truncate(k);
        sorted
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut map = FrequencyMap::new();
        for (word, count) in iter {
            map.add(word, count);
        }
        map
    }
}

/// Lowercases `text` and counts each maximal run of word characters.
pub fn count(text: &str) -> FrequencyMap {
    let lowered = text.to_lowercase();
    let mut map = FrequencyMap::new();
    for token in word_pattern().find_iter(&lowered) {
        map.add(token.as_str(), 1);
    }
    map
}
