//! Wire types for matcher configuration.
//!
//! Configs arrive as a byte buffer in one of two encodings, auto-detected by
//! the first non-whitespace byte: `{` means JSON, anything else MessagePack.
//! Both decode into the same types below.

use std::collections::HashMap;

use ib_canon::ProcessType;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::MatchError;

/// How a table's `word_list` is interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTableType {
    /// Entries are literals for [`SimpleMatcher`](super::SimpleMatcher).
    Simple {
        process_type: ProcessType,
    },
    /// Entries are regexes, similar-character rows or acrostic rows,
    /// depending on `regex_match_type`.
    Regex {
        process_type: ProcessType,
        regex_match_type: RegexMatchType,
    },
    /// Entries are literals compared by edit-distance ratio against the
    /// canonicalized text.
    Similar {
        process_type: ProcessType,
        sim_match_type: SimMatchType,
        threshold: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegexMatchType {
    SimilarChar,
    Acrostic,
    Regex,
}

/// Only `Levenshtein` is wired up. The remaining values are reserved wire
/// names that fail matcher construction rather than degrade to another
/// metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimMatchType {
    Levenshtein,
    DamerauLevenshtein,
    Indel,
    Jaro,
    JaroWinkler,
}

/// The per-rule unit of configuration.
///
/// `table_id` is a grouping key, not unique: hits of tables sharing an id
/// aggregate under it. If any word of `exemption_word_list` matches the text
/// under `exemption_process_type`, all of this table's hits for that text
/// are suppressed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchTable {
    pub table_id: u32,
    pub match_table_type: MatchTableType,
    pub word_list: Vec<String>,
    pub exemption_process_type: ProcessType,
    pub exemption_word_list: Vec<String>,
}

/// The full configuration: tables grouped by result key.
pub type MatchTableMap = HashMap<u32, Vec<MatchTable>>;

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, MatchError> {
    match bytes.iter().copied().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => decode_json(bytes),
        Some(_) => decode_msgpack(bytes),
        None => Err(MatchError::InvalidInput("empty config".into())),
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, MatchError> {
    serde_json::from_slice(bytes).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => MatchError::InvalidConfig(e.to_string()),
        _ => MatchError::InvalidInput(format!("invalid JSON: {e}")),
    })
}

pub(crate) fn decode_msgpack<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, MatchError> {
    rmp_serde::from_slice(bytes).map_err(|e| match e {
        rmp_serde::decode::Error::InvalidMarkerRead(_)
        | rmp_serde::decode::Error::InvalidDataRead(_) => {
            MatchError::InvalidInput(format!("invalid MessagePack: {e}"))
        }
        _ => MatchError::InvalidConfig(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_type_tags() {
        let json = serde_json::to_string(&MatchTableType::Simple {
            process_type: ProcessType::FANJIAN | ProcessType::DELETE,
        })
        .unwrap();
        assert_eq!(json, r#"{"simple":{"process_type":6}}"#);

        let similar: MatchTableType = serde_json::from_str(
            r#"{"similar":{"process_type":1,"sim_match_type":"levenshtein","threshold":0.8}}"#,
        )
        .unwrap();
        assert_eq!(
            similar,
            MatchTableType::Similar {
                process_type: ProcessType::NONE,
                sim_match_type: SimMatchType::Levenshtein,
                threshold: 0.8,
            }
        );

        let regex: MatchTableType = serde_json::from_str(
            r#"{"regex":{"process_type":1,"regex_match_type":"similar_char"}}"#,
        )
        .unwrap();
        assert_eq!(
            regex,
            MatchTableType::Regex {
                process_type: ProcessType::NONE,
                regex_match_type: RegexMatchType::SimilarChar,
            }
        );
    }

    #[test]
    fn reserved_metrics_deserialize() {
        for name in ["damerau_levenshtein", "indel", "jaro", "jaro_winkler"] {
            let json = format!(r#""{name}""#);
            serde_json::from_str::<SimMatchType>(&json).unwrap();
        }
        assert!(serde_json::from_str::<SimMatchType>(r#""cosine""#).is_err());
    }

    #[test]
    fn msgpack_roundtrip() {
        let table = MatchTable {
            table_id: 7,
            match_table_type: MatchTableType::Regex {
                process_type: ProcessType::NONE,
                regex_match_type: RegexMatchType::Acrostic,
            },
            word_list: vec!["h,e,l,l,o".into()],
            exemption_process_type: ProcessType::NONE,
            exemption_word_list: vec![],
        };
        let map: MatchTableMap = HashMap::from([(7, vec![table])]);
        let bytes = rmp_serde::to_vec_named(&map).unwrap();
        let decoded: MatchTableMap = decode(&bytes).unwrap();
        assert_eq!(decoded[&7][0].word_list, ["h,e,l,l,o"]);
    }

    #[test]
    fn decode_errors() {
        assert!(matches!(
            decode::<MatchTableMap>(b""),
            Err(MatchError::InvalidInput(_))
        ));
        assert!(matches!(
            decode::<MatchTableMap>(b"{\"1\": oops"),
            Err(MatchError::InvalidInput(_))
        ));
        // Well-formed JSON of the wrong shape is a config error.
        assert!(matches!(
            decode::<MatchTableMap>(br#"{"a": 1}"#),
            Err(MatchError::InvalidConfig(_))
        ));
        // Unknown process type bits are a config error too.
        assert!(matches!(
            decode::<MatchTableMap>(
                br#"{"1": [{
                    "table_id": 1,
                    "match_table_type": {"simple": {"process_type": 1024}},
                    "word_list": [],
                    "exemption_process_type": 1,
                    "exemption_word_list": []
                }]}"#
            ),
            Err(MatchError::InvalidConfig(_))
        ));
    }
}
