use std::{iter::once, ops::Range};

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{
    tables::{FANJIAN, NORM, PINYIN},
    ProcessType,
};

/// A canonicalized variant of an input text.
///
/// The text buffer and its offset map are allocated together per call and
/// freed together on drop.
#[derive(Clone, Debug)]
pub struct Canonical {
    text: String,
    /// One entry per byte of `text` plus a trailing sentinel: the byte
    /// offset in the original input the canonical byte came from.
    back_map: Vec<usize>,
}

impl Canonical {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Map a byte span of the canonical text back to the original text.
    ///
    /// The returned end is the origin of the first canonical byte after the
    /// span, so characters deleted inside the match stay covered.
    pub fn original_span(&self, span: Range<usize>) -> Range<usize> {
        let last = self.back_map.last().copied().unwrap_or(0);
        let start = self.back_map.get(span.start).copied().unwrap_or(last);
        let end = self.back_map.get(span.end).copied().unwrap_or(last);
        start..end.max(start)
    }
}

/// A character tagged with the byte offset it originates from.
type Tagged = (char, usize);

/// Canonicalize `text` under the given process type.
///
/// Transforms compose in a fixed order regardless of bit order: `FANJIAN`,
/// then `DELETE`, then `NORMALIZE`, then `PINYIN`/`PINYIN_CHAR`. All
/// transforms are idempotent on already-canonical text.
///
/// Returns at least one variant; masks without a pinyin bit always produce
/// exactly one, and the pinyin table holds one canonical reading per
/// character, so the current implementation does too.
pub fn transform(process_type: ProcessType, text: &str) -> Vec<Canonical> {
    let mut chars: Vec<Tagged> = text.char_indices().map(|(i, c)| (c, i)).collect();

    if process_type.contains(ProcessType::FANJIAN) {
        chars = fanjian(chars);
    }
    if process_type.contains(ProcessType::DELETE) {
        chars.retain(|&(c, _)| !is_noise(c));
    }
    if process_type.contains(ProcessType::NORMALIZE) {
        chars = normalize(chars);
    }
    if process_type.contains(ProcessType::PINYIN_CHAR) {
        chars = pinyin(chars, false);
    } else if process_type.contains(ProcessType::PINYIN) {
        chars = pinyin(chars, true);
    }

    vec![assemble(chars, text.len())]
}

fn assemble(chars: Vec<Tagged>, original_len: usize) -> Canonical {
    let mut text = String::with_capacity(chars.len());
    let mut back_map = Vec::with_capacity(chars.len() + 1);
    for (c, offset) in chars {
        text.push(c);
        back_map.extend(std::iter::repeat(offset).take(c.len_utf8()));
    }
    back_map.push(original_len);
    Canonical { text, back_map }
}

fn fanjian(chars: Vec<Tagged>) -> Vec<Tagged> {
    let mut out = Vec::with_capacity(chars.len());
    for (c, offset) in chars {
        match FANJIAN.get(&c) {
            Some(simplified) => out.extend(simplified.chars().map(|s| (s, offset))),
            None => out.push((c, offset)),
        }
    }
    out
}

/// Characters the `DELETE` transform removes: ASCII and CJK punctuation,
/// whitespace, zero-width characters.
fn is_noise(c: char) -> bool {
    c.is_ascii_punctuation()
        || c.is_whitespace()
        // Zero-width and BOM
        || matches!(c, '\u{200B}'..='\u{200F}' | '\u{2060}' | '\u{FEFF}')
        // General punctuation: curly quotes, dashes, ellipsis
        || matches!(c, '\u{2010}'..='\u{2027}')
        // CJK symbols and punctuation
        || matches!(c, '\u{3000}'..='\u{303F}')
        // Full-width and half-width forms, letters and digits excluded
        || matches!(
            c,
            '\u{FF01}'..='\u{FF0F}'
                | '\u{FF1A}'..='\u{FF20}'
                | '\u{FF3B}'..='\u{FF40}'
                | '\u{FF5B}'..='\u{FF65}'
        )
}

fn normalize(chars: Vec<Tagged>) -> Vec<Tagged> {
    let mut out = Vec::with_capacity(chars.len());
    for (c, offset) in chars {
        // A direct table hit wins over decomposition. This is what maps
        // homoglyphs (Ѐ → e) and enclosed digits (⒈, ㈠ → 1) whose NFKD
        // forms would keep stray marks or punctuation.
        if let Some(target) = NORM.get(&c) {
            out.extend(target.chars().map(|n| (n, offset)));
            continue;
        }
        // NFKD folds full-width forms and styled letters to their nominal
        // characters and splits off combining marks for stripping.
        for d in once(c).nfkd() {
            if is_combining_mark(d) {
                continue;
            }
            for l in d.to_lowercase() {
                match NORM.get(&l) {
                    Some(target) => out.extend(target.chars().map(|n| (n, offset))),
                    None => out.push((l, offset)),
                }
            }
        }
    }
    out
}

/// Expand Han characters to pinyin. With `delimited`, syllables are wrapped
/// in spaces and space runs collapse, so both `洗按` and `洗 按` canonicalize
/// to ` xi an ` and the automaton can only match whole syllables.
fn pinyin(chars: Vec<Tagged>, delimited: bool) -> Vec<Tagged> {
    let mut out: Vec<Tagged> = Vec::with_capacity(chars.len());
    let push = |out: &mut Vec<Tagged>, c: char, offset: usize| {
        if delimited && c == ' ' && matches!(out.last(), Some((' ', _))) {
            return;
        }
        out.push((c, offset));
    };
    for (c, offset) in chars {
        match PINYIN.get(&c) {
            Some(syllable) => {
                if delimited {
                    push(&mut out, ' ', offset);
                }
                for p in syllable.chars() {
                    push(&mut out, p, offset);
                }
                if delimited {
                    push(&mut out, ' ', offset);
                }
            }
            None => push(&mut out, c, offset),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(process_type: ProcessType, input: &str) -> String {
        let mut variants = transform(process_type, input);
        assert_eq!(variants.len(), 1);
        variants.pop().unwrap().text
    }

    #[test]
    fn none_is_identity() {
        let canonical = &transform(ProcessType::NONE, "It's /\\/\\y duty")[0];
        assert_eq!(canonical.text(), "It's /\\/\\y duty");
        assert_eq!(canonical.original_span(5..9), 5..9);
    }

    #[test]
    fn fanjian() {
        assert_eq!(text(ProcessType::FANJIAN, "妳好"), "你好");
        assert_eq!(text(ProcessType::FANJIAN, "簡體"), "简体");
        // Identity for non-CJK and for already-simplified text
        assert_eq!(text(ProcessType::FANJIAN, "abc 你好"), "abc 你好");
    }

    #[test]
    fn delete() {
        assert_eq!(text(ProcessType::DELETE, "你！好"), "你好");
        assert_eq!(text(ProcessType::DELETE, "h-e l.l,o！"), "hello");
        assert_eq!(text(ProcessType::DELETE, "a\u{200B}b\u{FEFF}c"), "abc");
    }

    #[test]
    fn normalize() {
        assert_eq!(text(ProcessType::NORMALIZE, "ℋЀ⒈㈠Õ"), "he11o");
        assert_eq!(text(ProcessType::NORMALIZE, "ＨＥＬＬＯ"), "hello");
        assert_eq!(text(ProcessType::NORMALIZE, "He①①o"), "he11o");
    }

    #[test]
    fn pinyin_delimited() {
        assert_eq!(text(ProcessType::PINYIN, "西安"), " xi an ");
        assert_eq!(text(ProcessType::PINYIN, "现"), " xian ");
        assert_eq!(text(ProcessType::PINYIN, "a洗按b"), "a xi an b");
        // A literal space between Han characters must not double up.
        assert_eq!(text(ProcessType::PINYIN, "洗 按"), " xi an ");
    }

    #[test]
    fn pinyin_char() {
        assert_eq!(text(ProcessType::PINYIN_CHAR, "西安"), "xian");
        assert_eq!(text(ProcessType::PINYIN_CHAR, "现"), "xian");
        assert_eq!(text(ProcessType::PINYIN_CHAR, "xian"), "xian");
    }

    #[test]
    fn pinyin_char_dominates() {
        let both = ProcessType::PINYIN | ProcessType::PINYIN_CHAR;
        assert_eq!(text(both, "西安"), "xian");
    }

    #[test]
    fn composition_order() {
        // Fanjian runs before pinyin, so traditional text romanizes through
        // its simplified form; delete runs before normalize, so full-width
        // punctuation is gone before width folding could keep it.
        let pt = ProcessType::FANJIAN | ProcessType::DELETE | ProcessType::PINYIN_CHAR;
        assert_eq!(text(pt, "見！面"), "jianmian");
    }

    #[test]
    fn idempotent() {
        for pt in [
            ProcessType::NONE,
            ProcessType::FANJIAN,
            ProcessType::DELETE,
            ProcessType::NORMALIZE,
            ProcessType::FANJIAN | ProcessType::DELETE | ProcessType::NORMALIZE,
        ] {
            for input in ["It's /\\/\\y duty", "妳！好", "ℋЀ⒈㈠Õ", "简体 abc"] {
                let first = text(pt, input);
                assert_eq!(text(pt, &first), first, "{pt:?} on {input:?}");
            }
        }
    }

    #[test]
    fn back_map_spans_deleted_chars() {
        let canonical = &transform(ProcessType::DELETE, "你！好")[0];
        assert_eq!(canonical.text(), "你好");
        // The span of the full canonical text covers the deleted ！ too.
        assert_eq!(canonical.original_span(0..6), 0..9);
        assert_eq!(canonical.original_span(0..3), 0..6);
        assert_eq!(canonical.original_span(3..6), 6..9);
    }

    #[test]
    fn back_map_expansion() {
        let canonical = &transform(ProcessType::PINYIN_CHAR, "b现b")[0];
        assert_eq!(canonical.text(), "bxianb");
        // Every pinyin letter maps back to the Han character that produced it.
        assert_eq!(canonical.original_span(1..5), 1..4);
    }
}
