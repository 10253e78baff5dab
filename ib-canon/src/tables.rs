//! Embedded lookup tables, loaded once on first use and shared process-wide.
//!
//! Each table is a line-oriented `source<TAB>target` text file where `source`
//! is a single character. Malformed lines are skipped with a warning rather
//! than failing initialization.

use std::collections::HashMap;

use once_cell::sync::Lazy;

const FANJIAN_DATA: &str = include_str!("../data/FANJIAN.txt");
const NORM_DATA: &str = include_str!("../data/NORM.txt");
const PINYIN_DATA: &str = include_str!("../data/PINYIN.txt");

/// Traditional → simplified Chinese.
pub(crate) static FANJIAN: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| parse(FANJIAN_DATA, "FANJIAN"));

/// Homoglyphs and styled letters → their ASCII nominal.
pub(crate) static NORM: Lazy<HashMap<char, &'static str>> = Lazy::new(|| parse(NORM_DATA, "NORM"));

/// Han character → canonical Hanyu Pinyin syllable.
pub(crate) static PINYIN: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| parse(PINYIN_DATA, "PINYIN"));

fn parse(data: &'static str, name: &str) -> HashMap<char, &'static str> {
    let mut table = HashMap::new();
    for line in data.lines() {
        if line.is_empty() {
            continue;
        }
        let Some((source, target)) = line.split_once('\t') else {
            log::warn!("{name}: skipping line without tab: {line:?}");
            continue;
        };
        let mut chars = source.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                if table.insert(c, target).is_some() {
                    log::warn!("{name}: duplicate entry for {c:?}");
                }
            }
            _ => log::warn!("{name}: source {source:?} is not a single character"),
        }
    }
    log::debug!("{name}: loaded {} entries", table.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_load() {
        assert_eq!(FANJIAN.get(&'妳'), Some(&"你"));
        assert_eq!(NORM.get(&'⒈'), Some(&"1"));
        assert_eq!(PINYIN.get(&'西'), Some(&"xi"));
        assert_eq!(PINYIN.get(&'安'), Some(&"an"));
    }

    #[test]
    fn targets_are_canonical() {
        // Fanjian targets must not themselves be mapped, or the transform
        // would not be idempotent.
        for target in FANJIAN.values() {
            for c in target.chars() {
                assert!(!FANJIAN.contains_key(&c), "{c:?} maps onwards");
            }
        }
        for target in NORM.values() {
            for c in target.chars() {
                assert!(!NORM.contains_key(&c), "{c:?} maps onwards");
            }
        }
    }
}
