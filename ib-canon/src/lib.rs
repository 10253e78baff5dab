/*!
Text canonicalization for word matching.

A [`ProcessType`] bitmask selects which transforms apply; [`transform`] runs
them in a fixed order and returns the canonical text together with a byte
offset map back to the input, so matches found in the canonical form can be
located in the original text.

## Transforms
- `FANJIAN`: traditional → simplified Chinese (繁体 → 简体).
- `DELETE`: drop punctuation, whitespace and zero-width noise.
- `NORMALIZE`: case fold, full-width → half-width, homoglyphs and styled
  letters → their ASCII nominal, combining marks stripped.
- `PINYIN`: every Han character becomes its space-delimited pinyin syllable,
  so automaton matches respect syllable boundaries (`洗按` ↔ `西安`).
- `PINYIN_CHAR`: like `PINYIN` but without delimiters, so `xian` can match
  `西安` and `现` can match either.

## Usage
```
use ib_canon::{transform, ProcessType};

let canonical = transform(ProcessType::FANJIAN | ProcessType::DELETE, "妳！好");
assert_eq!(canonical[0].text(), "你好");
```

The lookup tables behind `FANJIAN`, `NORMALIZE` and the pinyin transforms are
embedded in the binary and loaded once, on first use.
*/
mod process;
mod tables;
mod transform;

pub use process::ProcessType;
pub use transform::{transform, Canonical};
