//! The matcher itself: per-table strategies, exemptions, aggregation.

use std::collections::HashMap;

use bon::bon;
use itertools::Itertools;

use crate::error::MatchError;

mod config;
mod matches;
mod regex;
mod sim;
mod simple;

pub use config::{MatchTable, MatchTableMap, MatchTableType, RegexMatchType, SimMatchType};
pub use matches::{MatchResult, SimpleResult};
pub use simple::{SimpleMatcher, SimpleWordMap};

use self::regex::RegexTableMatcher;
use self::sim::SimTableMatcher;

pub(crate) fn decode_text(text: &[u8]) -> Result<&str, MatchError> {
    std::str::from_utf8(text)
        .map_err(|e| MatchError::InvalidInput(format!("text is not valid UTF-8: {e}")))
}

#[derive(Debug)]
enum Strategy {
    Simple(SimpleMatcher),
    Regex(RegexTableMatcher),
    Similar(SimTableMatcher),
}

/// One configured table compiled to its strategy matcher and, when it has
/// exemption words, an exemption [`SimpleMatcher`].
#[derive(Debug)]
struct TableMatcher {
    /// The [`MatchTableMap`] key this table's hits aggregate under.
    group: u32,
    table_id: u32,
    strategy: Strategy,
    exemption: Option<SimpleMatcher>,
}

impl TableMatcher {
    fn new(group: u32, table: &MatchTable, dfa: bool) -> Result<Self, MatchError> {
        let in_table = |e| match e {
            MatchError::InvalidConfig(msg) => {
                MatchError::InvalidConfig(format!("table {}: {msg}", table.table_id))
            }
            other => other,
        };

        let strategy = match &table.match_table_type {
            MatchTableType::Simple { process_type } => Strategy::Simple(
                SimpleMatcher::builder(&word_map(*process_type, &table.word_list))
                    .dfa(dfa)
                    .build()
                    .map_err(in_table)?,
            ),
            MatchTableType::Regex {
                process_type,
                regex_match_type,
            } => Strategy::Regex(RegexTableMatcher::new(
                table.table_id,
                *process_type,
                *regex_match_type,
                &table.word_list,
            )?),
            MatchTableType::Similar {
                process_type,
                sim_match_type,
                threshold,
            } => Strategy::Similar(SimTableMatcher::new(
                table.table_id,
                *process_type,
                *sim_match_type,
                *threshold,
                &table.word_list,
            )?),
        };

        let exemption = if table.exemption_word_list.is_empty() {
            None
        } else {
            Some(
                SimpleMatcher::builder(&word_map(
                    table.exemption_process_type,
                    &table.exemption_word_list,
                ))
                .dfa(dfa)
                .build()
                .map_err(in_table)?,
            )
        };

        Ok(Self {
            group,
            table_id: table.table_id,
            strategy,
            exemption,
        })
    }

    /// Matching words of this table, at most one per distinct `word_list`
    /// entry, exemptions not yet applied.
    fn match_words(&self, text: &str) -> Vec<String> {
        match &self.strategy {
            Strategy::Simple(m) => m.process(text).into_iter().map(|r| r.word).collect(),
            Strategy::Regex(m) => m.match_words(text),
            Strategy::Similar(m) => m.match_words(text),
        }
    }

    fn has_match(&self, text: &str) -> bool {
        match &self.strategy {
            Strategy::Simple(m) => m.is_match(text),
            Strategy::Regex(m) => m.has_match(text),
            Strategy::Similar(m) => m.has_match(text),
        }
    }

    fn is_exempted(&self, text: &str) -> bool {
        self.exemption.as_ref().is_some_and(|m| m.is_match(text))
    }
}

/// The orchestrator over a [`MatchTableMap`].
///
/// Built once from a decoded configuration; immutable and safe to share
/// across threads afterwards. Every query allocates only its own transform
/// buffers.
#[derive(Debug)]
pub struct Matcher {
    tables: Vec<TableMatcher>,
}

#[bon]
impl Matcher {
    /// Compiles every table of the map. Fails with
    /// [`MatchError::InvalidConfig`] naming the first offending table; no
    /// partial matcher is returned.
    #[builder]
    pub fn new(
        #[builder(start_fn)] table_map: &MatchTableMap,

        /// Compile the automatons to DFAs: faster queries at the cost of
        /// build time and memory.
        #[builder(default = false)]
        dfa: bool,
    ) -> Result<Self, MatchError> {
        let mut tables = Vec::new();
        for (&group, list) in table_map.iter().sorted_by_key(|(&group, _)| group) {
            for table in list {
                tables.push(TableMatcher::new(group, table, dfa)?);
            }
        }
        log::debug!("matcher: {} tables", tables.len());
        Ok(Self { tables })
    }
}

impl Matcher {
    /// Decode a configuration (JSON or MessagePack, auto-detected by the
    /// first non-whitespace byte) and build with defaults.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MatchError> {
        Self::builder(&config::decode::<MatchTableMap>(bytes)?).build()
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, MatchError> {
        Self::builder(&config::decode_json::<MatchTableMap>(bytes)?).build()
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, MatchError> {
        Self::builder(&config::decode_msgpack::<MatchTableMap>(bytes)?).build()
    }

    /// True iff any table produces at least one non-exempted hit. Stops at
    /// the first.
    pub fn is_match(&self, text: &str) -> bool {
        self.tables
            .iter()
            .any(|table| table.has_match(text) && !table.is_exempted(text))
    }

    /// All non-exempted hits, grouped by the configuration's map key, with
    /// `(table_id, word)` pairs de-duplicated. Keys without hits are absent.
    pub fn word_match(&self, text: &str) -> HashMap<u32, Vec<MatchResult>> {
        let mut results: HashMap<u32, Vec<MatchResult>> = HashMap::new();
        for table in &self.tables {
            let words = table.match_words(text);
            if words.is_empty() || table.is_exempted(text) {
                continue;
            }
            let hits = results.entry(table.group).or_default();
            for word in words {
                let hit = MatchResult {
                    table_id: table.table_id,
                    word,
                };
                if !hits.contains(&hit) {
                    hits.push(hit);
                }
            }
        }
        results
    }

    /// JSON rendering of [`word_match`](Self::word_match), for hosts
    /// without a decoder.
    pub fn word_match_as_string(&self, text: &str) -> Result<String, MatchError> {
        serde_json::to_string(&self.word_match(text)).map_err(|e| {
            log::error!("cannot serialize match results: {e}");
            MatchError::Internal(format!("cannot serialize match results: {e}"))
        })
    }

    /// Element-wise [`word_match`](Self::word_match); no cross-element
    /// state, intermediate buffers are released between elements.
    pub fn batch_word_match(&self, texts: &[&str]) -> Vec<HashMap<u32, Vec<MatchResult>>> {
        texts.iter().map(|text| self.word_match(text)).collect()
    }

    /// [`is_match`](Self::is_match) over raw bytes; fails with
    /// [`MatchError::InvalidInput`] if they are not UTF-8.
    pub fn is_match_bytes(&self, text: &[u8]) -> Result<bool, MatchError> {
        Ok(self.is_match(decode_text(text)?))
    }

    /// [`word_match`](Self::word_match) over raw bytes; fails with
    /// [`MatchError::InvalidInput`] if they are not UTF-8.
    pub fn word_match_bytes(
        &self,
        text: &[u8],
    ) -> Result<HashMap<u32, Vec<MatchResult>>, MatchError> {
        Ok(self.word_match(decode_text(text)?))
    }
}

fn word_map(process_type: ib_canon::ProcessType, word_list: &[String]) -> SimpleWordMap {
    let words = word_list
        .iter()
        .enumerate()
        .map(|(i, word)| (i as u32, word.clone()))
        .collect();
    HashMap::from([(process_type, words)])
}

#[cfg(test)]
mod tests {
    use ib_canon::ProcessType;

    use super::*;

    fn simple_table(table_id: u32, words: &[&str], exemptions: &[&str]) -> MatchTable {
        MatchTable {
            table_id,
            match_table_type: MatchTableType::Simple {
                process_type: ProcessType::NONE,
            },
            word_list: words.iter().map(|w| w.to_string()).collect(),
            exemption_process_type: ProcessType::NONE,
            exemption_word_list: exemptions.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn is_match_agrees_with_word_match() {
        let map = HashMap::from([(1, vec![simple_table(1, &["helloworld"], &[])])]);
        let matcher = Matcher::builder(&map).build().unwrap();
        for text in ["helloworld", "say helloworld", "hello world"] {
            assert_eq!(matcher.is_match(text), !matcher.word_match(text).is_empty());
        }
    }

    #[test]
    fn exemption_is_table_local() {
        let map = HashMap::from([
            (1, vec![simple_table(1, &["helloworld"], &["worldwide"])]),
            (2, vec![simple_table(2, &["hello"], &[])]),
        ]);
        let matcher = Matcher::builder(&map).build().unwrap();
        let results = matcher.word_match("helloworldwide");
        // Table 1 is exempted, table 2 is not.
        assert!(!results.contains_key(&1));
        assert_eq!(results[&2][0].word, "hello");
    }

    #[test]
    fn tables_sharing_a_group_aggregate() {
        let map = HashMap::from([(
            1,
            vec![
                simple_table(1, &["hello"], &[]),
                simple_table(1, &["hello", "world"], &[]),
            ],
        )]);
        let matcher = Matcher::builder(&map).build().unwrap();
        let results = matcher.word_match("helloworld");
        // (table_id, word) pairs are de-duplicated across tables.
        assert_eq!(results[&1].len(), 2);
    }

    #[test]
    fn adding_exemptions_only_shrinks_results() {
        let without = Matcher::builder(&HashMap::from([(
            1,
            vec![simple_table(1, &["helloworld"], &[])],
        )]))
        .build()
        .unwrap();
        let with = Matcher::builder(&HashMap::from([(
            1,
            vec![simple_table(1, &["helloworld"], &["wide"])],
        )]))
        .build()
        .unwrap();
        for text in ["helloworld", "helloworldwide", "unrelated"] {
            let a = without.word_match(text);
            let b = with.word_match(text);
            assert!(b.values().flatten().all(|hit| {
                a.get(&hit.table_id)
                    .is_some_and(|hits| hits.contains(hit))
            }));
        }
    }

    #[test]
    fn matchers_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Matcher>();
        assert_send_sync::<SimpleMatcher>();
    }

    #[test]
    fn dfa_build_matches_default() {
        let map = HashMap::from([(1, vec![simple_table(1, &["helloworld"], &[])])]);
        let dfa = Matcher::builder(&map).dfa(true).build().unwrap();
        assert!(dfa.is_match("helloworld"));
        assert!(!dfa.is_match("hello"));
    }
}
