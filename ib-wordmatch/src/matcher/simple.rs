use std::collections::{HashMap, HashSet};

use aho_corasick::{AhoCorasick, AhoCorasickKind, MatchKind};
use bon::bon;
use ib_canon::{transform, ProcessType};
use itertools::Itertools;

use crate::{
    error::MatchError,
    matcher::{
        config,
        matches::{SimpleResult, SpanHit},
    },
};

/// Wire shape of a standalone [`SimpleMatcher`] config:
/// `{process_type(u32): {word_id(u32): word}}`.
pub type SimpleWordMap = HashMap<ProcessType, HashMap<u32, String>>;

#[derive(Debug)]
struct PatternTag {
    process_type: ProcessType,
    word_id: u32,
    word: String,
}

/// Exact multi-pattern matcher across canonicalization variants.
///
/// Every configured word is canonicalized under its process type at build
/// time and fed into ONE automaton shared by all process types; a query
/// canonicalizes the text once per distinct process type, runs the shared
/// automaton over each variant and keeps the hits whose tag matches that
/// variant's process type. Building per-bucket automata instead would
/// multiply construction time, which dominates.
///
/// The automaton uses [`MatchKind::Standard`] with overlapping iteration: a
/// leftmost-longest automaton would drop hits that lose to a longer pattern
/// from another process bucket. The leftmost-longest result order is
/// restored by sorting the surviving hits.
#[derive(Debug)]
pub struct SimpleMatcher {
    automaton: AhoCorasick,
    /// Indexed by automaton pattern id.
    tags: Vec<PatternTag>,
    /// Distinct configured process types, ascending.
    process_types: Vec<ProcessType>,
}

#[bon]
impl SimpleMatcher {
    /// Canonicalizes every word and builds the shared automaton.
    ///
    /// Words that canonicalize to the empty string are skipped with a
    /// warning.
    #[builder]
    pub fn new(
        #[builder(start_fn)] word_map: &SimpleWordMap,

        /// Compile the automaton to a DFA: faster queries at the cost of
        /// build time and memory.
        #[builder(default = false)]
        dfa: bool,
    ) -> Result<Self, MatchError> {
        let mut patterns = Vec::new();
        let mut tags = Vec::new();
        for (&process_type, words) in word_map.iter().sorted_by_key(|(&pt, _)| pt) {
            for (&word_id, word) in words.iter().sorted_by_key(|(&id, _)| id) {
                let canonical = transform(process_type, word);
                let Some(first) = canonical.first() else {
                    continue;
                };
                if first.text().is_empty() {
                    log::warn!(
                        "skipping word {word_id} {word:?}: canonicalizes to nothing under {process_type:?}"
                    );
                    continue;
                }
                patterns.push(first.text().to_owned());
                tags.push(PatternTag {
                    process_type,
                    word_id,
                    word: word.clone(),
                });
            }
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .kind(dfa.then_some(AhoCorasickKind::DFA))
            .build(&patterns)
            .map_err(|e| MatchError::InvalidConfig(format!("cannot build automaton: {e}")))?;
        log::debug!("simple matcher: {} patterns", tags.len());

        Ok(Self {
            automaton,
            tags,
            process_types: word_map.keys().copied().sorted().collect(),
        })
    }
}

impl SimpleMatcher {
    /// Decode a standalone config (JSON or MessagePack, auto-detected) and
    /// build with defaults.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MatchError> {
        Self::builder(&config::decode::<SimpleWordMap>(bytes)?).build()
    }

    /// Returns true if any configured word occurs in `text` under its
    /// process type. Stops at the first hit.
    pub fn is_match(&self, text: &str) -> bool {
        self.process_types.iter().any(|&pt| {
            transform(pt, text).iter().any(|canonical| {
                self.automaton
                    .find_overlapping_iter(canonical.text())
                    .any(|m| {
                        self.tag(m.pattern().as_usize())
                            .is_some_and(|tag| tag.process_type == pt)
                    })
            })
        })
    }

    /// All configured words occurring in `text`, de-duplicated by word id.
    ///
    /// A word matching under several process types appears once. Results are
    /// ordered by leftmost occurrence in the original text, ties broken by
    /// longer match, then ascending word id.
    pub fn process(&self, text: &str) -> Vec<SimpleResult> {
        let mut hits: Vec<(SpanHit, &PatternTag)> = Vec::new();
        for &pt in &self.process_types {
            for canonical in &transform(pt, text) {
                for m in self.automaton.find_overlapping_iter(canonical.text()) {
                    let Some(tag) = self.tag(m.pattern().as_usize()) else {
                        continue;
                    };
                    if tag.process_type != pt {
                        continue;
                    }
                    let span = canonical.original_span(m.start()..m.end());
                    hits.push((
                        SpanHit {
                            start: span.start,
                            end: span.end,
                            word_id: tag.word_id,
                        },
                        tag,
                    ));
                }
            }
        }

        hits.sort_by(|(a, _), (b, _)| {
            a.start
                .cmp(&b.start)
                .then(b.len().cmp(&a.len()))
                .then(a.word_id.cmp(&b.word_id))
        });

        let mut seen = HashSet::new();
        hits.into_iter()
            .filter(|(hit, _)| seen.insert(hit.word_id))
            .map(|(hit, tag)| SimpleResult {
                word_id: hit.word_id,
                word: tag.word.clone(),
            })
            .collect()
    }

    /// [`process`](Self::process) over raw bytes; fails with
    /// [`MatchError::InvalidInput`] if they are not UTF-8.
    pub fn process_bytes(&self, text: &[u8]) -> Result<Vec<SimpleResult>, MatchError> {
        Ok(self.process(super::decode_text(text)?))
    }

    /// Element-wise [`process`](Self::process). Intermediate buffers are
    /// released between elements.
    pub fn batch_process(&self, texts: &[&str]) -> Vec<Vec<SimpleResult>> {
        texts.iter().map(|text| self.process(text)).collect()
    }

    /// Pattern ids are assigned from `tags`, so a miss is a bug.
    fn tag(&self, pattern: usize) -> Option<&PatternTag> {
        let tag = self.tags.get(pattern);
        if tag.is_none() {
            log::error!("internal error: no tag for pattern id {pattern}");
        }
        tag
    }
}
