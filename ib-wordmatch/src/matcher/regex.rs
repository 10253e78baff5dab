use ib_canon::{transform, ProcessType};
use itertools::Itertools;
use regex::Regex;

use crate::{error::MatchError, matcher::config::RegexMatchType};

/// Sentence boundaries for the acrostic strategy: ASCII and CJK clause
/// punctuation plus line breaks.
const SENTENCE_DELIMITERS: &[char] = &[
    ',', '.', '!', '?', ';', '。', '，', '！', '？', '；', '\n', '\r',
];

/// The regex-family strategies: plain regex, similar-character alternation
/// and acrostic. All of them canonicalize the text under the table's process
/// type before matching.
#[derive(Debug)]
pub(crate) enum RegexTableMatcher {
    /// Every row of the word list is an independent regex; a hit reports the
    /// row.
    Regex {
        process_type: ProcessType,
        patterns: Vec<(Regex, String)>,
    },
    /// The whole word list is ONE composite pattern: row i becomes the group
    /// `(alt1|alt2|…)` of its comma-separated alternatives and the groups
    /// concatenate in row order. A hit reports the matched text, which
    /// appears in no single row.
    SimilarChar {
        process_type: ProcessType,
        composite: Option<Regex>,
    },
    /// Each row's comma-separated elements must lead the first sentences of
    /// the text, in order; a hit reports the row.
    Acrostic {
        process_type: ProcessType,
        patterns: Vec<(Vec<String>, String)>,
    },
}

impl RegexTableMatcher {
    pub fn new(
        table_id: u32,
        process_type: ProcessType,
        kind: RegexMatchType,
        word_list: &[String],
    ) -> Result<Self, MatchError> {
        match kind {
            RegexMatchType::Regex => {
                let patterns = word_list
                    .iter()
                    .map(|word| {
                        Regex::new(word).map(|re| (re, word.clone())).map_err(|e| {
                            MatchError::InvalidConfig(format!(
                                "table {table_id}: invalid regex {word:?}: {e}"
                            ))
                        })
                    })
                    .collect::<Result<_, _>>()?;
                Ok(Self::Regex {
                    process_type,
                    patterns,
                })
            }
            RegexMatchType::SimilarChar => {
                let composite = if word_list.is_empty() {
                    None
                } else {
                    let pattern: String = word_list
                        .iter()
                        .map(|row| format!("({})", row.split(',').map(regex::escape).join("|")))
                        .collect();
                    Some(Regex::new(&pattern).map_err(|e| {
                        MatchError::InvalidConfig(format!(
                            "table {table_id}: cannot combine similar-char rows: {e}"
                        ))
                    })?)
                };
                Ok(Self::SimilarChar {
                    process_type,
                    composite,
                })
            }
            RegexMatchType::Acrostic => {
                let patterns = word_list
                    .iter()
                    .map(|word| {
                        let elements = word
                            .split(',')
                            .map(|element| element.trim().to_lowercase())
                            .collect();
                        (elements, word.clone())
                    })
                    .collect();
                Ok(Self::Acrostic {
                    process_type,
                    patterns,
                })
            }
        }
    }

    /// All matching words, de-duplicated, in pattern order (matched-text
    /// order for the similar-char strategy).
    pub fn match_words(&self, text: &str) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();
        match self {
            Self::Regex {
                process_type,
                patterns,
            } => {
                for canonical in &transform(*process_type, text) {
                    for (re, word) in patterns {
                        if !words.contains(word) && re.is_match(canonical.text()) {
                            words.push(word.clone());
                        }
                    }
                }
            }
            Self::SimilarChar {
                process_type,
                composite,
            } => {
                let Some(re) = composite else {
                    return words;
                };
                for canonical in &transform(*process_type, text) {
                    for m in re.find_iter(canonical.text()) {
                        if !words.iter().any(|w| w == m.as_str()) {
                            words.push(m.as_str().to_owned());
                        }
                    }
                }
            }
            Self::Acrostic {
                process_type,
                patterns,
            } => {
                for canonical in &transform(*process_type, text) {
                    let sentences = sentences(canonical.text());
                    for (elements, word) in patterns {
                        if !words.contains(word) && leads(&sentences, elements) {
                            words.push(word.clone());
                        }
                    }
                }
            }
        }
        words
    }

    /// Like [`match_words`](Self::match_words) but stops at the first hit.
    pub fn has_match(&self, text: &str) -> bool {
        match self {
            Self::Regex {
                process_type,
                patterns,
            } => transform(*process_type, text)
                .iter()
                .any(|canonical| patterns.iter().any(|(re, _)| re.is_match(canonical.text()))),
            Self::SimilarChar {
                process_type,
                composite,
            } => composite.as_ref().is_some_and(|re| {
                transform(*process_type, text)
                    .iter()
                    .any(|canonical| re.is_match(canonical.text()))
            }),
            Self::Acrostic {
                process_type,
                patterns,
            } => transform(*process_type, text).iter().any(|canonical| {
                let sentences = sentences(canonical.text());
                patterns
                    .iter()
                    .any(|(elements, _)| leads(&sentences, elements))
            }),
        }
    }
}

/// Non-empty sentences, trimmed. Segments that are empty after trimming do
/// not count: they have no first character to compare.
fn sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_DELIMITERS)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// The i-th element must lead the i-th sentence, case-insensitively.
/// Elements are lowercased at build time.
fn leads(sentences: &[&str], elements: &[String]) -> bool {
    if sentences.len() < elements.len() {
        return false;
    }
    elements
        .iter()
        .zip(sentences)
        .all(|(element, sentence)| sentence.to_lowercase().starts_with(element.as_str()))
}
