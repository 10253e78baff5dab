use ib_canon::{transform, ProcessType};

use crate::{error::MatchError, matcher::config::SimMatchType};

#[derive(Debug)]
struct SimPattern {
    /// Canonical form compared against the text.
    canonical: String,
    /// Char length of the canonical form.
    chars: usize,
    /// Original word, reported on a hit.
    word: String,
}

/// Edit-distance similarity matching.
///
/// The canonicalized text is compared to each pattern with the normalized
/// Levenshtein ratio `1 − dist/max(len_a, len_b)`; a ratio at or above the
/// threshold is a hit. Texts whose char length differs from a pattern's by
/// more than `⌈len·(1−threshold)⌉` cannot reach the threshold and are
/// skipped without computing the distance.
#[derive(Debug)]
pub(crate) struct SimTableMatcher {
    process_type: ProcessType,
    threshold: f64,
    patterns: Vec<SimPattern>,
}

impl SimTableMatcher {
    pub fn new(
        table_id: u32,
        process_type: ProcessType,
        sim_match_type: SimMatchType,
        threshold: f64,
        word_list: &[String],
    ) -> Result<Self, MatchError> {
        // The reserved metrics fail construction instead of silently
        // degrading to Levenshtein.
        if sim_match_type != SimMatchType::Levenshtein {
            return Err(MatchError::InvalidConfig(format!(
                "table {table_id}: unsupported similarity metric {sim_match_type:?}"
            )));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MatchError::InvalidConfig(format!(
                "table {table_id}: threshold {threshold} is not within [0, 1]"
            )));
        }

        let mut patterns = Vec::with_capacity(word_list.len());
        for word in word_list {
            let Some(canonical) = transform(process_type, word).into_iter().next() else {
                continue;
            };
            if canonical.text().is_empty() {
                log::warn!(
                    "table {table_id}: skipping word {word:?}: canonicalizes to nothing under {process_type:?}"
                );
                continue;
            }
            patterns.push(SimPattern {
                chars: canonical.text().chars().count(),
                canonical: canonical.text().to_owned(),
                word: word.clone(),
            });
        }
        Ok(Self {
            process_type,
            threshold,
            patterns,
        })
    }

    /// All patterns similar enough to the text, de-duplicated, in
    /// configuration order.
    pub fn match_words(&self, text: &str) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();
        for canonical in &transform(self.process_type, text) {
            let chars = canonical.text().chars().count();
            for pattern in &self.patterns {
                if !words.contains(&pattern.word) && self.similar(pattern, canonical.text(), chars)
                {
                    words.push(pattern.word.clone());
                }
            }
        }
        words
    }

    /// Like [`match_words`](Self::match_words) but stops at the first hit.
    pub fn has_match(&self, text: &str) -> bool {
        transform(self.process_type, text).iter().any(|canonical| {
            let chars = canonical.text().chars().count();
            self.patterns
                .iter()
                .any(|pattern| self.similar(pattern, canonical.text(), chars))
        })
    }

    fn similar(&self, pattern: &SimPattern, text: &str, text_chars: usize) -> bool {
        let slack = ((1.0 - self.threshold) * pattern.chars as f64).ceil() as usize;
        if pattern.chars.abs_diff(text_chars) > slack {
            return false;
        }
        let longest = pattern.chars.max(text_chars);
        if longest == 0 {
            return true;
        }
        // Integer formulation of `1 − dist/longest ≥ threshold`: dividing
        // first would reject exact-threshold ratios like 2 edits over 10
        // chars against 0.8.
        let distance = strsim::levenshtein(&pattern.canonical, text);
        (longest - distance) as f64 >= self.threshold * longest as f64
    }
}
