use bitflags::bitflags;

bitflags! {
    /// Bitmask selecting which canonicalization transforms apply to a text.
    ///
    /// Transforms compose in a fixed order regardless of bit order:
    /// fanjian, then deletion, then normalization, then pinyin expansion.
    /// `NONE` is a sentinel for matching the raw text; combining it with
    /// other bits has no additional effect.
    ///
    /// `PINYIN` and `PINYIN_CHAR` are mutually exclusive in practice. If
    /// both are set, `PINYIN_CHAR` wins.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ProcessType: u32 {
        /// Match the text as-is.
        const NONE = 0b00000001;
        /// Traditional → simplified Chinese.
        const FANJIAN = 0b00000010;
        /// Delete punctuation, whitespace and zero-width characters.
        const DELETE = 0b00000100;
        /// Case folding, width folding, homoglyph normalization.
        const NORMALIZE = 0b00001000;
        /// Han characters → space-delimited pinyin syllables.
        const PINYIN = 0b00010000;
        /// Han characters → pinyin letters, no delimiters.
        const PINYIN_CHAR = 0b00100000;
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::ProcessType;

    impl Serialize for ProcessType {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_u32(self.bits())
        }
    }

    struct BitsVisitor;

    impl de::Visitor<'_> for BitsVisitor {
        type Value = ProcessType;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a process type bitmask")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProcessType, E> {
            let bits = u32::try_from(v)
                .map_err(|_| E::custom(format!("process type {v} out of range")))?;
            ProcessType::from_bits(bits)
                .ok_or_else(|| E::custom(format!("unknown process type bits {bits:#010b}")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProcessType, E> {
            let v = u64::try_from(v)
                .map_err(|_| E::custom(format!("process type {v} out of range")))?;
            self.visit_u64(v)
        }

        /// JSON object keys always arrive as strings.
        fn visit_str<E: de::Error>(self, v: &str) -> Result<ProcessType, E> {
            let bits: u64 = v
                .parse()
                .map_err(|_| E::custom(format!("invalid process type {v:?}")))?;
            self.visit_u64(bits)
        }
    }

    impl<'de> Deserialize<'de> for ProcessType {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(BitsVisitor)
        }
    }
}
