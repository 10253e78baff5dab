use serde::{Deserialize, Serialize};

/// A [`SimpleMatcher`](super::SimpleMatcher) hit: the original configured
/// word, not the canonical form the automaton saw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleResult {
    pub word_id: u32,
    pub word: String,
}

/// A [`Matcher`](super::Matcher) hit, reported under the owning table's id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub table_id: u32,
    pub word: String,
}

/// A raw automaton hit mapped back to the original text. Used to order and
/// de-duplicate hits before they are surfaced.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SpanHit {
    pub start: usize,
    pub end: usize,
    pub word_id: u32,
}

impl SpanHit {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}
