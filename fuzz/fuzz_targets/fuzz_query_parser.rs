#![no_main]

use libfuzzer_sys::fuzz_target;
use alfred_core::query::parser::parse_query_string;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(query) = std::str::from_utf8(data) {
        // Limit query length to prevent timeout
        if query.len() > 10_000 {
            return;
        }

        // Parsing never fails, it only drops what it does not understand
        let option = parse_query_string(query);
        for filter in &option.filters {
            assert!(!filter.param.is_empty());
        }
    }
});
