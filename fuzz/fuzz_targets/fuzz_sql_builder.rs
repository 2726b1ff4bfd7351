#![no_main]

use alfred::{build_query, parse_pairs};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    pairs: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    if input.pairs.len() > 64 {
        return;
    }

    let option = parse_pairs(input.pairs.iter().map(|(k, v)| (k, v)));
    let sql = build_query("SELECT * FROM t", &option);

    assert!(sql.starts_with("SELECT *"));
    assert!(sql.ends_with(&format!(" OFFSET {}", option.offset)));

    // Every literal is closed when no identifier carries a quote of its own
    if !option.sort_by.contains('\'') {
        assert_eq!(sql.matches('\'').count() % 2, 0, "{}", sql);
    }
});
