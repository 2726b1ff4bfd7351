#![no_main]

use alfred::{impl_record, Alfred};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug, Clone)]
struct Row {
    name: String,
    score: i64,
    ratio: f64,
    flag: bool,
    tags: Vec<String>,
}

impl_record!(Row { name, score, ratio, flag, tags });

#[derive(Arbitrary, Debug)]
struct Input {
    query: String,
    rows: Vec<Row>,
}

fuzz_target!(|input: Input| {
    if input.query.len() > 1_000 || input.rows.len() > 256 {
        return;
    }

    let alfred = Alfred::new();
    let option = alfred.parse(&input.query);
    let count = input.rows.len();

    if let Ok(page) = alfred.apply(input.rows, &option) {
        assert_eq!(page.total + page.rejected + page.errors.len(), count);
        assert!(page.items.len() <= page.total);
    }
});
