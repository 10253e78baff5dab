use std::collections::HashMap;

use ib_wordmatch::{
    canon::ProcessType,
    matcher::{Matcher, SimpleMatcher},
};

fn main() {
    // 14 = fanjian | delete | normalize
    let matcher = Matcher::from_bytes(
        r#"{
            "1": [{
                "table_id": 1,
                "match_table_type": {"simple": {"process_type": 14}},
                "word_list": ["你好"],
                "exemption_process_type": 1,
                "exemption_word_list": []
            }]
        }"#
        .as_bytes(),
    )
    .unwrap();
    assert!(matcher.is_match("妳！好"));
    println!("{}", matcher.word_match_as_string("妳！好").unwrap());

    let word_map = HashMap::from([(
        ProcessType::PINYIN_CHAR,
        HashMap::from([(1, "西安".to_string())]),
    )]);
    let matcher = SimpleMatcher::builder(&word_map).build().unwrap();
    assert!(matcher.is_match("xian"));
    assert!(matcher.is_match("现"));
    // Matching is transform-driven, not fuzzy: unrelated pinyin stays out.
    assert!(!matcher.is_match("xun"));
}
