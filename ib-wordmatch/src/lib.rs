/*!
A multi-strategy forbidden word matching engine.

## Features
- Exact multi-pattern matching with one shared Aho-Corasick automaton across
  all canonicalization variants: 繁→简 conversion, noise deletion, width/case
  normalization, 拼音 expansion (see [`canon`]).
- Regular expression, similar-character and acrostic strategies.
- Edit-distance similarity matching with a configurable threshold.
- Per-table exemption words that suppress otherwise-matching hits.
- Configs decode from JSON or MessagePack, auto-detected.

Matchers are immutable once built and safe to query from multiple threads.
*/
//! ## Usage
//! ```
//! use ib_wordmatch::matcher::Matcher;
//!
//! let matcher = Matcher::from_bytes(
//!     r#"{
//!         "1": [{
//!             "table_id": 1,
//!             "match_table_type": {"simple": {"process_type": 2}},
//!             "word_list": ["你好"],
//!             "exemption_process_type": 1,
//!             "exemption_word_list": []
//!         }]
//!     }"#
//!     .as_bytes(),
//! )
//! .unwrap();
//! assert!(matcher.is_match("妳好"));
//! assert_eq!(matcher.word_match("妳好")[&1][0].word, "你好");
//! ```
//!
//! [`SimpleMatcher`](matcher::SimpleMatcher) can also be used standalone:
//! ```
//! use std::collections::HashMap;
//!
//! use ib_wordmatch::{canon::ProcessType, matcher::SimpleMatcher};
//!
//! let word_map = HashMap::from([(
//!     ProcessType::PINYIN_CHAR,
//!     HashMap::from([(1, "西安".to_string())]),
//! )]);
//! let matcher = SimpleMatcher::builder(&word_map).build().unwrap();
//! assert!(matcher.is_match("xian"));
//! assert!(matcher.is_match("现"));
//! ```
pub mod error;
pub mod matcher;

pub use ib_canon as canon;
