//! cargo bench --bench matcher
use std::{collections::HashMap, hint::black_box};

use criterion::{criterion_group, criterion_main, Criterion};
use ib_wordmatch::{
    canon::ProcessType,
    matcher::{MatchTable, MatchTableMap, MatchTableType, Matcher, SimpleMatcher, SimpleWordMap},
};

const HAYSTACK: &str = "前面的文字 妳！好 後面還有一些 ＨＥＬＬＯ 以及 helloworld 结尾";

pub fn criterion_benchmark(c: &mut Criterion) {
    {
        let word_map: SimpleWordMap = HashMap::from([(
            ProcessType::FANJIAN | ProcessType::DELETE | ProcessType::NORMALIZE,
            (0..100)
                .map(|i| (i, format!("词语{i}")))
                .chain([(1000, "你好".to_string())])
                .collect(),
        )]);
        let simple = SimpleMatcher::builder(&word_map).build().unwrap();
        assert!(simple.is_match(HAYSTACK));
        c.bench_function("simple_process", |b| {
            b.iter(|| simple.process(black_box(HAYSTACK)))
        });

        let dfa = SimpleMatcher::builder(&word_map).dfa(true).build().unwrap();
        c.bench_function("simple_process_dfa", |b| {
            b.iter(|| dfa.process(black_box(HAYSTACK)))
        });
    }

    {
        let map: MatchTableMap = HashMap::from([(
            1,
            vec![MatchTable {
                table_id: 1,
                match_table_type: MatchTableType::Simple {
                    process_type: ProcessType::FANJIAN | ProcessType::DELETE,
                },
                word_list: vec!["你好".into(), "helloworld".into()],
                exemption_process_type: ProcessType::NONE,
                exemption_word_list: vec!["这不算数".into()],
            }],
        )]);
        let matcher = Matcher::builder(&map).build().unwrap();
        assert!(matcher.is_match(HAYSTACK));
        c.bench_function("word_match", |b| {
            b.iter(|| matcher.word_match(black_box(HAYSTACK)))
        });
        c.bench_function("is_match", |b| {
            b.iter(|| matcher.is_match(black_box(HAYSTACK)))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
