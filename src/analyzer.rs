use std::collections::BTreeSet;

use crate::error::Result;
use crate::record::Record;
use crate::tokenize::{count, FrequencyMap};

/// Title-versus-body vocabulary comparison for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub id: i64,
    pub unique_title: BTreeSet<String>,
    pub unique_body: BTreeSet<String>,
    pub common: BTreeSet<String>,
    pub all_words: FrequencyMap,
}

/// Compares the vocabulary of a record's title and body.
///
/// Fails with `InvalidRecord` when either field is missing; nothing is
/// tokenized in that case.
pub fn analyze(record: &Record) -> Result<AnalysisResult> {
    let title = record.title()?;
    let body = record.body()?;

    let title_freq = count(title);
    let body_freq = count(body);

    let mut unique_title = BTreeSet::new();
    let mut common = BTreeSet::new();
    for word in title_freq.keys() {
        if body_freq.contains(word) {
            common.insert(word.to_string());
        } else {
            unique_title.insert(word.to_string());
        }
    }

    let unique_body = body_freq
        .keys()
        .filter(|word| !title_freq.contains(word))
        .map(str::to_string)
        .collect();

    Ok(AnalysisResult {
        id: record.id,
        unique_title,
        unique_body,
        common,
        all_words: title_freq.merge(&body_freq),
    })
}
